//! Error types for configuration loading and engine misuse.
//!
//! Failed placement or connection attempts are not errors: they are counted in
//! the generation report and the engine moves on.

use std::io;

use thiserror::Error;
use toml::de;

use crate::mapgen::GenerationPhase;
use crate::types::Coord;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] de::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum DungeonError {
    /// A coordinate with no backing cell was handed to the grid or pathfinder.
    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(Coord),

    #[error("operation requires phase {expected:?}, generator is in {actual:?}")]
    InvalidPhase { expected: GenerationPhase, actual: GenerationPhase },

    #[error("{pending} room(s) have not reported ready")]
    RoomsNotReady { pending: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
