//! Public data models describing generation progress and its results.

use serde::Serialize;

use crate::types::{Coord, Direction, WorldPos};

/// Lifecycle of one dungeon grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GenerationPhase {
    Empty,
    RoomsPlaced,
    Connecting,
    WallsSpawned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ConnectionOutcome {
    /// At most one room still had open doors when the loop ended.
    FullyConnected,
    /// The retry budget ran out with `open_rooms` rooms still waiting for a corridor.
    RetriesExhausted { open_rooms: usize },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub rooms_placed: usize,
    pub placement_attempts_failed: usize,
    pub connections_made: usize,
    pub connection_attempts_failed: usize,
    /// Subset of `connection_attempts_failed` caused by doors without a grid cell.
    pub unresolved_door_attempts: usize,
    pub corridor_tiles: usize,
    pub walls: usize,
    pub connection: Option<ConnectionOutcome>,
}

impl GenerationReport {
    pub fn is_fully_connected(&self) -> bool {
        self.connection == Some(ConnectionOutcome::FullyConnected)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WallPlacement {
    pub tile: Coord,
    /// Side of the corridor tile the wall closes off.
    pub side: Direction,
    pub position: WorldPos,
    pub facing: Direction,
}
