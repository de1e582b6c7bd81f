//! Dungeon layout engine split into coherent submodules.

pub mod model;

mod corridors;
mod generator;
mod layout;
mod render;
mod walls;

#[cfg(test)]
mod test_support;

pub use generator::{DungeonGenerator, generate_dungeon};
pub use model::{ConnectionOutcome, GenerationPhase, GenerationReport, WallPlacement};
