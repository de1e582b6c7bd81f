//! ASCII dump of one grid layer for the CLI and debugging.

use std::collections::{BTreeMap, BTreeSet};

use crate::occupancy::OccupancyGrid;
use crate::room::Room;
use crate::types::Coord;

pub(super) struct LayerView<'a> {
    pub(super) grid: &'a OccupancyGrid,
    pub(super) rooms: Vec<&'a dyn Room>,
    pub(super) corridor_tiles: &'a [Coord],
    pub(super) y: i32,
}

/// One row per `z`, one character per `x`:
/// `+` open door, `/` used door, `#` room, `.` corridor, `x` claimed, space free.
pub(super) fn render_layer(view: &LayerView<'_>) -> String {
    let grid = view.grid;
    if view.y < 0 || view.y >= grid.height() as i32 {
        return String::new();
    }

    let doors: BTreeMap<Coord, bool> = view
        .rooms
        .iter()
        .flat_map(|room| room.doors().iter())
        .filter_map(|door| door.cell.map(|cell| (cell, door.is_open)))
        .collect();
    let corridor: BTreeSet<Coord> = view.corridor_tiles.iter().copied().collect();

    let mut out = String::with_capacity((grid.width() + 1) * grid.depth());
    for z in 0..grid.depth() as i32 {
        for x in 0..grid.width() as i32 {
            let coord = Coord::new(x, view.y, z);
            let glyph = match doors.get(&coord) {
                Some(true) => '+',
                Some(false) => '/',
                None if view.rooms.iter().any(|room| room.spec().contains(coord)) => '#',
                None if corridor.contains(&coord) => '.',
                None if !grid.is_available(coord) => 'x',
                None => ' ',
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
