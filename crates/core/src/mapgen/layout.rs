//! Room placement and buffer reopening on the occupancy grid.

use rand_chacha::ChaCha8Rng;

use crate::config::DungeonConfig;
use crate::occupancy::OccupancyGrid;
use crate::room::RoomSpec;
use crate::seed::{ROOM_SEED_LIMIT, random_range};
use crate::types::Coord;

#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct RoomPlacement {
    pub(super) specs: Vec<RoomSpec>,
    pub(super) failed_attempts: usize,
}

/// Throws rooms at the grid until `placement_retry_budget` attempts fail in a row.
pub(super) fn place_rooms(
    grid: &mut OccupancyGrid,
    rng: &mut ChaCha8Rng,
    config: &DungeonConfig,
) -> RoomPlacement {
    let mut placement = RoomPlacement::default();
    let mut retries_left = config.placement_retry_budget;

    while retries_left > 0 {
        let origin = Coord::new(
            sample_origin_axis(rng, grid.width()),
            sample_origin_axis(rng, grid.height()),
            sample_origin_axis(rng, grid.depth()),
        );
        if !grid.is_available(origin) {
            retries_left -= 1;
            placement.failed_attempts += 1;
            continue;
        }

        let width = random_range(rng, config.room_size.min, config.room_size.max);
        let depth = random_range(rng, config.room_size.min, config.room_size.max);
        let Some(claimed) =
            claimable_cells(grid, origin, width, depth, config.min_distance_between_rooms)
        else {
            retries_left -= 1;
            placement.failed_attempts += 1;
            continue;
        };

        for &coord in &claimed {
            grid.set_available(coord, false);
        }

        let spec = RoomSpec {
            origin,
            world_position: grid.world_position(origin),
            width,
            height: 1,
            depth,
            tile_size: config.cell_size,
            door_count: random_range(rng, config.doors.min, config.doors.max),
            window_count: random_range(rng, config.windows.min, config.windows.max),
            decoration: config.decoration,
            layout_seed: random_range(rng, 0, ROOM_SEED_LIMIT),
            decoration_seed: random_range(rng, 0, ROOM_SEED_LIMIT),
        };
        tracing::debug!(
            origin = %spec.origin,
            width = spec.width,
            depth = spec.depth,
            doors = spec.door_count,
            "placed room"
        );
        placement.specs.push(spec);
        retries_left = config.placement_retry_budget;
    }

    placement
}

// Keeps a one-cell margin from the boundary when the axis is wide enough for it.
fn sample_origin_axis(rng: &mut ChaCha8Rng, extent: usize) -> i32 {
    if extent < 3 {
        return 0;
    }
    random_range(rng, 1, extent as i32 - 2)
}

/// Footprint plus `buffer` on every horizontal side, from the room's layer to the top
/// of the grid. `None` if any of those cells is missing or already claimed.
fn claimable_cells(
    grid: &OccupancyGrid,
    origin: Coord,
    width: i32,
    depth: i32,
    buffer: i32,
) -> Option<Vec<Coord>> {
    let mut cells = Vec::new();
    for x in (origin.x - buffer)..(origin.x + width + buffer) {
        for y in origin.y..grid.height() as i32 {
            for z in (origin.z - buffer)..(origin.z + depth + buffer) {
                let coord = Coord::new(x, y, z);
                if !grid.is_available(coord) {
                    return None;
                }
                cells.push(coord);
            }
        }
    }
    Some(cells)
}

/// Cells reserved around a room's footprint on its own layer.
pub(super) fn buffer_cells(spec: &RoomSpec, buffer: i32) -> impl Iterator<Item = Coord> + '_ {
    let Coord { x, y, z } = spec.origin;
    ((x - buffer)..(x + spec.width + buffer))
        .flat_map(move |cx| ((z - buffer)..(z + spec.depth + buffer)).map(move |cz| (cx, cz)))
        .filter(move |&(cx, cz)| {
            !((x..x + spec.width).contains(&cx) && (z..z + spec.depth).contains(&cz))
        })
        .map(move |(cx, cz)| Coord::new(cx, y, cz))
}

/// Frees every room's buffer band so corridors can run between rooms. Footprints stay claimed.
///
/// The whole band is reopened, not only the four edge lines at distances 1 and `buffer`
/// that an asymmetric reopening would touch.
pub(super) fn reopen_buffers(grid: &mut OccupancyGrid, specs: &[&RoomSpec], buffer: i32) {
    for spec in specs {
        for coord in buffer_cells(spec, buffer) {
            grid.set_available(coord, true);
        }
    }
}
