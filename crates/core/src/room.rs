//! Room collaborator contract and a reference room implementation.
//! This module exists so the layout engine depends only on readiness and door queries.
//! It does not own room placement, which is decided by the layout engine.

use crossbeam_channel::Sender;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::DecorationSettings;
use crate::occupancy::OccupancyGrid;
use crate::seed::{random_index, seeded_rng, shuffle_prefix};
use crate::types::{Coord, RoomId, WorldPos};

/// Everything a room needs to lay itself out, fixed at placement time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoomSpec {
    pub origin: Coord,
    pub world_position: WorldPos,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
    pub tile_size: f32,
    pub door_count: i32,
    pub window_count: i32,
    pub decoration: DecorationSettings,
    pub layout_seed: i32,
    pub decoration_seed: i32,
}

impl RoomSpec {
    pub fn contains(&self, coord: Coord) -> bool {
        coord.y == self.origin.y
            && (self.origin.x..self.origin.x + self.width).contains(&coord.x)
            && (self.origin.z..self.origin.z + self.depth).contains(&coord.z)
    }

    /// Cells directly outside the footprint on the room's layer, walking each side in turn.
    pub fn perimeter(&self) -> Vec<Coord> {
        let Coord { x, y, z } = self.origin;
        let mut cells = Vec::with_capacity(2 * (self.width + self.depth) as usize);
        for dx in 0..self.width {
            cells.push(Coord::new(x + dx, y, z - 1));
            cells.push(Coord::new(x + dx, y, z + self.depth));
        }
        for dz in 0..self.depth {
            cells.push(Coord::new(x - 1, y, z + dz));
            cells.push(Coord::new(x + self.width, y, z + dz));
        }
        cells
    }

    pub fn interior(&self) -> impl Iterator<Item = Coord> + '_ {
        let Coord { x, y, z } = self.origin;
        (0..self.depth)
            .flat_map(move |dz| (0..self.width).map(move |dx| Coord::new(x + dx, y, z + dz)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Door {
    pub is_open: bool,
    /// `None` until the room resolves the door onto a grid cell.
    pub cell: Option<Coord>,
}

/// Fires a room's ready notification. Cloneable so a room can hand it to deferred work.
#[derive(Clone, Debug)]
pub struct ReadyNotifier {
    room: RoomId,
    sender: Sender<RoomId>,
}

impl ReadyNotifier {
    pub(crate) fn new(room: RoomId, sender: Sender<RoomId>) -> Self {
        Self { room, sender }
    }

    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn notify(&self) {
        if self.sender.send(self.room).is_err() {
            tracing::debug!(room = ?self.room, "ready notification dropped, generator is gone");
        }
    }
}

pub trait Room {
    fn spec(&self) -> &RoomSpec;

    /// Starts the room's own layout. The room must eventually call `notifier.notify()`.
    fn enable(&mut self, grid: &OccupancyGrid, notifier: ReadyNotifier);

    fn is_ready(&self) -> bool;

    fn doors(&self) -> &[Door];

    fn doors_mut(&mut self) -> &mut [Door];

    fn open_door_count(&self) -> usize {
        self.doors().iter().filter(|door| door.is_open).count()
    }
}

pub trait RoomBuilder {
    type Room: Room;

    fn build(&mut self, spec: RoomSpec) -> Self::Room;
}

/// Reference room: doors and windows on distinct cells just outside its walls,
/// props scattered inside. Ready as soon as it is enabled.
#[derive(Clone, Debug, Serialize)]
pub struct SimpleRoom {
    spec: RoomSpec,
    doors: Vec<Door>,
    windows: Vec<Coord>,
    wall_decorations: Vec<Coord>,
    props: Vec<Coord>,
    ready: bool,
}

impl SimpleRoom {
    pub fn new(spec: RoomSpec) -> Self {
        Self {
            spec,
            doors: Vec::new(),
            windows: Vec::new(),
            wall_decorations: Vec::new(),
            props: Vec::new(),
            ready: false,
        }
    }

    pub fn windows(&self) -> &[Coord] {
        &self.windows
    }

    pub fn wall_decorations(&self) -> &[Coord] {
        &self.wall_decorations
    }

    pub fn props(&self) -> &[Coord] {
        &self.props
    }

    fn lay_out(&mut self, grid: &OccupancyGrid) {
        let mut layout_rng = seeded_rng(self.spec.layout_seed as u64);
        let mut perimeter = self.spec.perimeter();
        let slots = perimeter.len();
        let door_count = (self.spec.door_count.max(0) as usize).min(slots);
        shuffle_prefix(&mut layout_rng, &mut perimeter, slots);

        self.doors = perimeter[..door_count]
            .iter()
            .map(|&coord| Door { is_open: true, cell: grid.contains(coord).then_some(coord) })
            .collect();

        let remaining = &perimeter[door_count..];
        let window_count = (self.spec.window_count.max(0) as usize).min(remaining.len());
        self.windows = remaining[..window_count].to_vec();

        let mut decoration_rng = seeded_rng(self.spec.decoration_seed as u64);
        let wall_slots = &remaining[window_count..];
        let settings = self.spec.decoration;
        let wall_count = if settings.use_max_wall_decoration {
            wall_slots.len()
        } else {
            (settings.wall_decorations as usize).min(wall_slots.len())
        };
        let mut wall_slots = wall_slots.to_vec();
        shuffle_prefix(&mut decoration_rng, &mut wall_slots, wall_count);
        self.wall_decorations = wall_slots[..wall_count].to_vec();

        let mut interior: Vec<Coord> = self.spec.interior().collect();
        let prop_count = if settings.use_max_prop_decoration {
            interior.len()
        } else {
            (settings.prop_decorations as usize).min(interior.len())
        };
        shuffle_prefix(&mut decoration_rng, &mut interior, prop_count);
        self.props = interior[..prop_count].to_vec();
    }
}

impl Room for SimpleRoom {
    fn spec(&self) -> &RoomSpec {
        &self.spec
    }

    fn enable(&mut self, grid: &OccupancyGrid, notifier: ReadyNotifier) {
        self.lay_out(grid);
        self.ready = true;
        notifier.notify();
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

#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleRoomBuilder;

impl RoomBuilder for SimpleRoomBuilder {
    type Room = SimpleRoom;

    fn build(&mut self, spec: RoomSpec) -> SimpleRoom {
        SimpleRoom::new(spec)
    }
}

/// Picks one open door index uniformly, or `None` when every door is closed.
pub(crate) fn pick_open_door<R: Room + ?Sized>(room: &R, rng: &mut ChaCha8Rng) -> Option<usize> {
    let open: Vec<usize> = room
        .doors()
        .iter()
        .enumerate()
        .filter(|(_, door)| door.is_open)
        .map(|(index, _)| index)
        .collect();
    if open.is_empty() {
        return None;
    }
    Some(open[random_index(rng, open.len())])
}
