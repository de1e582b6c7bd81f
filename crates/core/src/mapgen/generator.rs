//! Dungeon generation orchestration: placement, the room-ready barrier, corridors and walls.

use std::collections::BTreeSet;
use std::hash::Hasher;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rand_chacha::ChaCha8Rng;
use slotmap::SlotMap;
use xxhash_rust::xxh3::Xxh3;

use crate::config::DungeonConfig;
use crate::error::DungeonError;
use crate::geometry::GeometrySink;
use crate::occupancy::OccupancyGrid;
use crate::room::{ReadyNotifier, Room, RoomBuilder, RoomSpec};
use crate::seed::seeded_rng;
use crate::types::{Coord, RoomId};

use super::corridors::{ConnectionContext, connect_rooms};
use super::layout::{place_rooms, reopen_buffers};
use super::model::{ConnectionOutcome, GenerationPhase, GenerationReport, WallPlacement};
use super::render::{LayerView, render_layer};
use super::walls::spawn_walls;

pub struct DungeonGenerator<B: RoomBuilder> {
    config: DungeonConfig,
    builder: B,
    rng: ChaCha8Rng,
    grid: OccupancyGrid,
    rooms: SlotMap<RoomId, B::Room>,
    spawn_order: Vec<RoomId>,
    subscribed: BTreeSet<RoomId>,
    ready_sender: Sender<RoomId>,
    ready_receiver: Receiver<RoomId>,
    rooms_enabled: bool,
    corridor_tiles: Vec<Coord>,
    walls: Vec<WallPlacement>,
    phase: GenerationPhase,
    report: GenerationReport,
}

impl<B: RoomBuilder> DungeonGenerator<B> {
    pub fn new(config: DungeonConfig, builder: B) -> Result<Self, DungeonError> {
        config.validate()?;
        let grid = OccupancyGrid::open(
            config.width as usize,
            config.height as usize,
            config.depth as usize,
            config.cell_size,
            config.origin(),
        );
        let (ready_sender, ready_receiver) = unbounded();
        Ok(Self {
            rng: seeded_rng(config.seed),
            config,
            builder,
            grid,
            rooms: SlotMap::with_key(),
            spawn_order: Vec::new(),
            subscribed: BTreeSet::new(),
            ready_sender,
            ready_receiver,
            rooms_enabled: false,
            corridor_tiles: Vec::new(),
            walls: Vec::new(),
            phase: GenerationPhase::Empty,
            report: GenerationReport::default(),
        })
    }

    /// `Empty -> RoomsPlaced`. Returns how many rooms were placed.
    pub fn place_rooms(&mut self) -> Result<usize, DungeonError> {
        self.expect_phase(GenerationPhase::Empty)?;

        let placement = place_rooms(&mut self.grid, &mut self.rng, &self.config);
        for spec in placement.specs {
            let id = self.rooms.insert(self.builder.build(spec));
            self.spawn_order.push(id);
            self.subscribed.insert(id);
        }

        self.report.rooms_placed = self.spawn_order.len();
        self.report.placement_attempts_failed = placement.failed_attempts;
        self.phase = GenerationPhase::RoomsPlaced;
        tracing::info!(
            rooms = self.report.rooms_placed,
            failed_attempts = placement.failed_attempts,
            "room placement finished"
        );
        Ok(self.report.rooms_placed)
    }

    /// Hands every room its ready notifier so it can start its own layout.
    /// Rooms are enabled once; repeat calls do nothing.
    pub fn enable_rooms(&mut self) -> Result<(), DungeonError> {
        self.expect_phase(GenerationPhase::RoomsPlaced)?;
        if self.rooms_enabled {
            tracing::debug!("rooms already enabled");
            return Ok(());
        }
        self.rooms_enabled = true;
        for &id in &self.spawn_order {
            let notifier = ReadyNotifier::new(id, self.ready_sender.clone());
            self.rooms[id].enable(&self.grid, notifier);
        }
        Ok(())
    }

    /// Drains pending ready notifications and, once every room is ready, connects
    /// the rooms and derives walls. Returns `true` when generation has finished.
    pub fn poll_ready(&mut self, sink: &mut dyn GeometrySink) -> Result<bool, DungeonError> {
        let mut notified = self.rooms.is_empty();
        for id in self.ready_receiver.try_iter() {
            if self.subscribed.contains(&id) {
                notified = true;
            } else {
                tracing::debug!(room = ?id, "ignoring notification from unsubscribed room");
            }
        }

        if notified && self.phase == GenerationPhase::RoomsPlaced && self.all_rooms_ready() {
            self.connect_rooms(sink)?;
        }
        Ok(self.phase == GenerationPhase::WallsSpawned)
    }

    pub fn all_rooms_ready(&self) -> bool {
        self.rooms.values().all(|room| room.is_ready())
    }

    pub fn pending_rooms(&self) -> usize {
        self.rooms.values().filter(|room| !room.is_ready()).count()
    }

    /// `RoomsPlaced -> Connecting -> WallsSpawned`. Requires every room to be ready.
    pub fn connect_rooms(&mut self, sink: &mut dyn GeometrySink) -> Result<(), DungeonError> {
        self.expect_phase(GenerationPhase::RoomsPlaced)?;
        let pending = self.pending_rooms();
        if pending > 0 {
            return Err(DungeonError::RoomsNotReady { pending });
        }
        self.phase = GenerationPhase::Connecting;

        let specs: Vec<&RoomSpec> =
            self.spawn_order.iter().map(|&id| self.rooms[id].spec()).collect();
        reopen_buffers(&mut self.grid, &specs, self.config.min_distance_between_rooms);

        let stats = connect_rooms(
            &mut ConnectionContext {
                grid: &mut self.grid,
                rooms: &mut self.rooms,
                spawn_order: &self.spawn_order,
                rng: &mut self.rng,
                retry_budget: self.config.connection_retry_budget,
                corridor_tiles: &mut self.corridor_tiles,
            },
            sink,
        )?;
        self.report.connections_made = stats.connections_made;
        self.report.connection_attempts_failed = stats.failed_attempts;
        self.report.unresolved_door_attempts = stats.unresolved_door_attempts;
        self.report.corridor_tiles = self.corridor_tiles.len();
        self.report.connection = Some(stats.outcome);
        match stats.outcome {
            ConnectionOutcome::FullyConnected => tracing::info!(
                connections = stats.connections_made,
                corridor_tiles = self.corridor_tiles.len(),
                "all rooms connected"
            ),
            ConnectionOutcome::RetriesExhausted { open_rooms } => tracing::warn!(
                connections = stats.connections_made,
                open_rooms,
                "connection retries exhausted, dungeon is partially connected"
            ),
        }

        self.walls = spawn_walls(&mut self.grid, &self.corridor_tiles, sink);
        self.report.walls = self.walls.len();
        self.phase = GenerationPhase::WallsSpawned;
        tracing::info!(walls = self.walls.len(), "walls spawned");

        self.teardown();
        Ok(())
    }

    /// Stops listening to every room. Later notifications are ignored.
    pub fn teardown(&mut self) {
        self.subscribed.clear();
    }

    pub fn is_subscribed(&self, id: RoomId) -> bool {
        self.subscribed.contains(&id)
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn room(&self, id: RoomId) -> Option<&B::Room> {
        self.rooms.get(id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut B::Room> {
        self.rooms.get_mut(id)
    }

    /// Rooms in spawn order.
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &B::Room)> + '_ {
        self.spawn_order.iter().map(|&id| (id, &self.rooms[id]))
    }

    pub fn corridor_tiles(&self) -> &[Coord] {
        &self.corridor_tiles
    }

    pub fn walls(&self) -> &[WallPlacement] {
        &self.walls
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    pub fn render_layer(&self, y: i32) -> String {
        render_layer(&LayerView {
            grid: &self.grid,
            rooms: self.rooms().map(|(_, room)| room as &dyn Room).collect(),
            corridor_tiles: &self.corridor_tiles,
            y,
        })
    }

    /// Stable hash of rooms, occupancy and corridors for determinism checks.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.config.seed);
        hasher.write_u8(self.phase as u8);
        hasher.write_u64(self.spawn_order.len() as u64);
        for (_, room) in self.rooms() {
            let spec = room.spec();
            write_coord(&mut hasher, spec.origin);
            hasher.write_i32(spec.width);
            hasher.write_i32(spec.depth);
            hasher.write_i32(spec.layout_seed);
            for door in room.doors() {
                hasher.write_u8(u8::from(door.is_open));
                if let Some(cell) = door.cell {
                    write_coord(&mut hasher, cell);
                }
            }
        }
        for cell in self.grid.cells() {
            hasher.write_u8(u8::from(cell.is_available));
        }
        hasher.write_u64(self.corridor_tiles.len() as u64);
        for &tile in &self.corridor_tiles {
            write_coord(&mut hasher, tile);
        }
        hasher.write_u64(self.walls.len() as u64);
        hasher.finish()
    }

    fn expect_phase(&self, expected: GenerationPhase) -> Result<(), DungeonError> {
        if self.phase != expected {
            return Err(DungeonError::InvalidPhase { expected, actual: self.phase });
        }
        Ok(())
    }
}

fn write_coord(hasher: &mut Xxh3, coord: Coord) {
    hasher.write_i32(coord.x);
    hasher.write_i32(coord.y);
    hasher.write_i32(coord.z);
}

/// Runs every phase for rooms that report ready while being enabled.
///
/// Rooms that defer their notification leave the generator in `RoomsPlaced`;
/// keep calling [`DungeonGenerator::poll_ready`] until it returns `true`.
pub fn generate_dungeon<B: RoomBuilder>(
    config: DungeonConfig,
    builder: B,
    sink: &mut dyn GeometrySink,
) -> Result<DungeonGenerator<B>, DungeonError> {
    let mut generator = DungeonGenerator::new(config, builder)?;
    generator.place_rooms()?;
    generator.enable_rooms()?;
    generator.poll_ready(sink)?;
    Ok(generator)
}
