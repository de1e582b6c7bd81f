//! Generation inputs, loaded once from TOML before a run starts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::WorldPos;

pub const DEFAULT_RETRY_BUDGET: u32 = 30;
pub const MAX_ROOM_BUFFER: i32 = 10;

/// Half-open integer range `[min, max)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: i32,
    pub max: i32,
}

impl CountRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationSettings {
    pub use_max_wall_decoration: bool,
    pub wall_decorations: u32,
    pub use_max_prop_decoration: bool,
    pub prop_decorations: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub cell_size: f32,
    pub origin: [f32; 3],
    pub min_distance_between_rooms: i32,
    pub room_size: CountRange,
    pub doors: CountRange,
    pub windows: CountRange,
    pub decoration: DecorationSettings,
    pub seed: u64,
    pub placement_retry_budget: u32,
    pub connection_retry_budget: u32,
    pub debug_grid: bool,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 1,
            depth: 40,
            cell_size: 1.0,
            origin: [0.0; 3],
            min_distance_between_rooms: 2,
            room_size: CountRange::new(4, 9),
            doors: CountRange::new(1, 4),
            windows: CountRange::new(0, 3),
            decoration: DecorationSettings::default(),
            seed: 0,
            placement_retry_budget: DEFAULT_RETRY_BUDGET,
            connection_retry_budget: DEFAULT_RETRY_BUDGET,
            debug_grid: false,
        }
    }
}

impl DungeonConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn origin(&self) -> WorldPos {
        WorldPos::new(self.origin[0], self.origin[1], self.origin[2])
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let extents = [("width", self.width), ("height", self.height), ("depth", self.depth)];
        for (field, value) in extents {
            if value <= 0 {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(invalid("cell_size", format!("must be positive, got {}", self.cell_size)));
        }
        let buffer = self.min_distance_between_rooms;
        if !(1..=MAX_ROOM_BUFFER).contains(&buffer) {
            let reason = format!("must be within 1..={MAX_ROOM_BUFFER}, got {buffer}");
            return Err(invalid("min_distance_between_rooms", reason));
        }
        if self.room_size.min < 1 {
            let reason = format!("min must be at least 1, got {}", self.room_size.min);
            return Err(invalid("room_size", reason));
        }
        let ranges =
            [("room_size", self.room_size), ("doors", self.doors), ("windows", self.windows)];
        for (field, range) in ranges {
            if range.min < 0 || range.max < range.min {
                let reason = format!("expected 0 <= min <= max, got {}..{}", range.min, range.max);
                return Err(invalid(field, reason));
            }
        }
        if self.placement_retry_budget == 0 {
            return Err(invalid("placement_retry_budget", "must be at least 1".to_string()));
        }
        if self.connection_retry_budget == 0 {
            return Err(invalid("connection_retry_budget", "must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
