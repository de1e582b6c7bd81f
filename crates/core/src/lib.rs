pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod mapgen;
pub mod occupancy;
pub mod pathfinding;
pub mod room;
pub mod types;

mod seed;

pub use config::{CountRange, DecorationSettings, DungeonConfig};
pub use error::{ConfigError, DungeonError};
pub use geometry::{GeometryRequest, GeometrySink, NullSink, RecordingSink};
pub use grid::Grid;
pub use mapgen::{
    ConnectionOutcome, DungeonGenerator, GenerationPhase, GenerationReport, WallPlacement,
    generate_dungeon,
};
pub use occupancy::{OccupancyCell, OccupancyGrid};
pub use pathfinding::{FoundPath, Pathfinder, distance_cost, path_cost};
pub use room::{Door, ReadyNotifier, Room, RoomBuilder, RoomSpec, SimpleRoom, SimpleRoomBuilder};
pub use seed::ROOM_SEED_LIMIT;
pub use types::*;
