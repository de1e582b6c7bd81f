//! Shared room fixtures for the `mapgen` test suites.
//! This module exists to avoid repeating hand-placed rooms across corridor and barrier tests.
//! It does not own production room behaviour.

use crate::config::DecorationSettings;
use crate::occupancy::OccupancyGrid;
use crate::room::{Door, ReadyNotifier, Room, RoomBuilder, RoomSpec};
use crate::types::{Coord, WorldPos};

pub(super) fn spec_at(origin: Coord, width: i32, depth: i32) -> RoomSpec {
    RoomSpec {
        origin,
        world_position: WorldPos::new(origin.x as f32, origin.y as f32, origin.z as f32),
        width,
        height: 1,
        depth,
        tile_size: 1.0,
        door_count: 1,
        window_count: 0,
        decoration: DecorationSettings::default(),
        layout_seed: 0,
        decoration_seed: 0,
    }
}

/// Room whose door cells are fixed up front. Optionally holds back its ready
/// notification until [`FixedRoom::finish`] is called.
#[derive(Debug)]
pub(super) struct FixedRoom {
    spec: RoomSpec,
    doors: Vec<Door>,
    ready: bool,
    defer_ready: bool,
    pending: Option<ReadyNotifier>,
}

impl FixedRoom {
    pub(super) fn new(spec: RoomSpec, door_cells: &[Option<Coord>]) -> Self {
        let doors = door_cells.iter().map(|&cell| Door { is_open: true, cell }).collect();
        Self { spec, doors, ready: false, defer_ready: false, pending: None }
    }

    pub(super) fn deferred(mut self) -> Self {
        self.defer_ready = true;
        self
    }

    pub(super) fn finish(&mut self) {
        self.ready = true;
        if let Some(notifier) = self.pending.take() {
            notifier.notify();
        }
    }
}

impl Room for FixedRoom {
    fn spec(&self) -> &RoomSpec {
        &self.spec
    }

    fn enable(&mut self, _grid: &OccupancyGrid, notifier: ReadyNotifier) {
        if self.defer_ready {
            self.pending = Some(notifier);
        } else {
            self.ready = true;
            notifier.notify();
        }
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn doors(&self) -> &[Door] {
        &self.doors
    }

    fn doors_mut(&mut self) -> &mut [Door] {
        &mut self.doors
    }
}

/// Places a single door on the -X side of every room, halfway along its depth.
/// Every `defer_every`-th room (1-based) holds back its ready notification.
#[derive(Debug, Default)]
pub(super) struct WestDoorBuilder {
    defer_every: Option<usize>,
    built: usize,
}

impl WestDoorBuilder {
    pub(super) fn deferring_every(every: usize) -> Self {
        Self { defer_every: Some(every), built: 0 }
    }
}

impl RoomBuilder for WestDoorBuilder {
    type Room = FixedRoom;

    fn build(&mut self, spec: RoomSpec) -> FixedRoom {
        self.built += 1;
        let door = Coord::new(spec.origin.x - 1, spec.origin.y, spec.origin.z + spec.depth / 2);
        let room = FixedRoom::new(spec, &[Some(door)]);
        match self.defer_every {
            Some(every) if self.built.is_multiple_of(every) => room.deferred(),
            _ => room,
        }
    }
}
