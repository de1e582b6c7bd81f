//! Fire-and-forget geometry requests emitted while corridors and walls are derived.

use serde::Serialize;

use crate::types::{Direction, WorldPos};

pub trait GeometrySink {
    fn place_floor(&mut self, position: WorldPos);

    /// `facing` points from the wall back toward the corridor tile it encloses.
    fn place_wall(&mut self, position: WorldPos, facing: Direction);
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeometryRequest {
    Floor { position: WorldPos },
    Wall { position: WorldPos, facing: Direction },
}

/// Keeps every request in emission order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub requests: Vec<GeometryRequest>,
}

impl RecordingSink {
    pub fn floors(&self) -> impl Iterator<Item = WorldPos> + '_ {
        self.requests.iter().filter_map(|request| match request {
            GeometryRequest::Floor { position } => Some(*position),
            GeometryRequest::Wall { .. } => None,
        })
    }

    pub fn walls(&self) -> impl Iterator<Item = (WorldPos, Direction)> + '_ {
        self.requests.iter().filter_map(|request| match request {
            GeometryRequest::Wall { position, facing } => Some((*position, *facing)),
            GeometryRequest::Floor { .. } => None,
        })
    }
}

impl GeometrySink for RecordingSink {
    fn place_floor(&mut self, position: WorldPos) {
        self.requests.push(GeometryRequest::Floor { position });
    }

    fn place_wall(&mut self, position: WorldPos, facing: Direction) {
        self.requests.push(GeometryRequest::Wall { position, facing });
    }
}

/// Discards everything; for callers that only need the occupancy result.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl GeometrySink for NullSink {
    fn place_floor(&mut self, _position: WorldPos) {}

    fn place_wall(&mut self, _position: WorldPos, _facing: Direction) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_splits_floors_and_walls() {
        let mut sink = RecordingSink::default();
        sink.place_floor(WorldPos::new(1.0, 0.0, 2.0));
        sink.place_wall(WorldPos::new(1.5, 0.0, 2.0), Direction::NegX);
        sink.place_floor(WorldPos::new(2.0, 0.0, 2.0));

        assert_eq!(sink.requests.len(), 3);
        assert_eq!(sink.floors().count(), 2);
        let walls: Vec<_> = sink.walls().collect();
        assert_eq!(walls, vec![(WorldPos::new(1.5, 0.0, 2.0), Direction::NegX)]);
    }

    #[test]
    fn requests_serialize_with_a_kind_tag() {
        let position = WorldPos::new(0.5, 0.0, 0.0);
        let request = GeometryRequest::Wall { position, facing: Direction::NegX };
        let json = serde_json::to_string(&request).expect("request serializes");
        assert_eq!(
            json,
            r#"{"kind":"wall","position":{"x":0.5,"y":0.0,"z":0.0},"facing":"NegX"}"#
        );
    }
}
