use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dungeon_core::{
    Coord, DungeonConfig, GenerationReport, GeometryRequest, RecordingSink, SimpleRoom,
    SimpleRoomBuilder, generate_dungeon,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Ascii,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML dungeon config. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Overrides the seed from the config file
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(short, long, value_enum, default_value_t = Format::Ascii)]
    format: Format,
    /// Grid layer to print in ascii mode
    #[arg(short, long, default_value_t = 0)]
    layer: i32,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    seed: u64,
    fingerprint: u64,
    report: &'a GenerationReport,
    rooms: Vec<&'a SimpleRoom>,
    corridor_tiles: &'a [Coord],
    geometry: &'a [GeometryRequest],
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn load_config(path: Option<&PathBuf>, seed: Option<u64>) -> Result<DungeonConfig> {
    let mut config = match path {
        Some(path) => DungeonConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DungeonConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_ref(), args.seed)?;
    let seed = config.seed;
    let debug_grid = config.debug_grid;
    tracing::info!(seed, width = config.width, depth = config.depth, "generating dungeon");
    let mut sink = RecordingSink::default();
    let generator = generate_dungeon(config, SimpleRoomBuilder, &mut sink)
        .with_context(|| format!("Dungeon generation failed for seed {seed}"))?;
    let report = generator.report();

    match args.format {
        Format::Json => {
            let output = JsonOutput {
                seed,
                fingerprint: generator.fingerprint(),
                report,
                rooms: generator.rooms().map(|(_, room)| room).collect(),
                corridor_tiles: generator.corridor_tiles(),
                geometry: &sink.requests,
            };
            let json = serde_json::to_string_pretty(&output)
                .with_context(|| "Failed to serialize dungeon JSON")?;
            println!("{json}");
        }
        Format::Ascii => {
            println!("Seed: {seed}");
            println!("Rooms: {}", report.rooms_placed);
            println!(
                "Corridors: {} ({} tiles, {} walls)",
                report.connections_made, report.corridor_tiles, report.walls
            );
            println!("Connection: {:?}", report.connection);
            println!("Fingerprint: {:016x}", generator.fingerprint());

            let layers: Vec<i32> = if debug_grid {
                (0..generator.grid().height() as i32).collect()
            } else {
                vec![args.layer]
            };
            for layer in layers {
                println!();
                println!("Layer {layer}:");
                print!("{}", generator.render_layer(layer));
            }
        }
    }

    Ok(())
}
