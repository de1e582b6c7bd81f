use std::collections::BTreeSet;

use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::{
    Coord, CountRange, DungeonConfig, GenerationPhase, NullSink, Room, SimpleRoomBuilder,
    generate_dungeon,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
}

fn pick(rng: &mut ChaCha8Rng, min: i32, max: i32) -> i32 {
    min + (rng.next_u64() % (max - min) as u64) as i32
}

fn random_config(rng: &mut ChaCha8Rng) -> DungeonConfig {
    let room_min = pick(rng, 2, 6);
    let door_min = pick(rng, 0, 3);
    DungeonConfig {
        width: pick(rng, 6, 64),
        height: pick(rng, 1, 3),
        depth: pick(rng, 6, 64),
        cell_size: [0.5, 1.0, 2.0, 4.0][pick(rng, 0, 4) as usize],
        min_distance_between_rooms: pick(rng, 1, 5),
        room_size: CountRange::new(room_min, room_min + pick(rng, 0, 6)),
        doors: CountRange::new(door_min, door_min + pick(rng, 0, 4)),
        seed: rng.next_u64(),
        placement_retry_budget: pick(rng, 1, 40) as u32,
        connection_retry_budget: pick(rng, 1, 40) as u32,
        ..DungeonConfig::default()
    }
}

fn check_run(config: DungeonConfig) -> Result<()> {
    let seed = config.seed;
    let generator = generate_dungeon(config, SimpleRoomBuilder, &mut NullSink)?;

    if generator.phase() != GenerationPhase::WallsSpawned {
        bail!("Invariant failed: generation stalled in {:?} on seed {seed}", generator.phase());
    }

    let corridor: BTreeSet<Coord> = generator.corridor_tiles().iter().copied().collect();
    for &tile in &corridor {
        if generator.grid().is_available(tile) {
            bail!("Invariant failed: corridor tile {tile} left available on seed {seed}");
        }
        if generator.rooms().any(|(_, room)| room.spec().contains(tile)) {
            bail!("Invariant failed: corridor tile {tile} inside a room on seed {seed}");
        }
    }

    for wall in generator.walls() {
        let neighbour = wall.tile.step(wall.side);
        if corridor.contains(&neighbour) || !generator.grid().is_available(neighbour) {
            bail!("Invariant failed: wall against a closed cell {neighbour} on seed {seed}");
        }
    }

    let open_rooms = generator.rooms().filter(|(_, room)| room.open_door_count() > 0).count();
    if generator.report().is_fully_connected() && open_rooms > 1 {
        bail!("Invariant failed: {open_rooms} rooms left open after full connection, seed {seed}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} dungeons...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut partial = 0;

    for _ in 0..args.runs {
        let config = random_config(&mut rng);
        let seed = config.seed;
        let fingerprint = generate_dungeon(config.clone(), SimpleRoomBuilder, &mut NullSink)?
            .fingerprint();
        let replay = generate_dungeon(config.clone(), SimpleRoomBuilder, &mut NullSink)?;
        if replay.fingerprint() != fingerprint {
            bail!("Invariant failed: seed {seed} is not reproducible");
        }
        if !replay.report().is_fully_connected() {
            partial += 1;
        }
        check_run(config)?;
    }

    println!("Fuzz complete. {} runs, {} partially connected.", args.runs, partial);
    Ok(())
}
