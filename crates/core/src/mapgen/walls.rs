//! Wall derivation around carved corridor tiles.

use crate::geometry::GeometrySink;
use crate::occupancy::OccupancyGrid;
use crate::types::{Coord, Direction};

use super::model::WallPlacement;

/// Closes every available side of every corridor tile with a wall half a cell out.
pub(super) fn spawn_walls(
    grid: &mut OccupancyGrid,
    corridor_tiles: &[Coord],
    sink: &mut dyn GeometrySink,
) -> Vec<WallPlacement> {
    for &tile in corridor_tiles {
        grid.set_available(tile, false);
    }

    let half_cell = grid.cell_size() * 0.5;
    let mut walls = Vec::new();
    for &tile in corridor_tiles {
        let tile_position = grid.world_position(tile);
        for side in Direction::ALL {
            if !grid.is_available(tile.step(side)) {
                continue;
            }
            let wall = WallPlacement {
                tile,
                side,
                position: tile_position + side.unit() * half_cell,
                facing: side.opposite(),
            };
            sink.place_wall(wall.position, wall.facing);
            walls.push(wall);
        }
    }
    walls
}
