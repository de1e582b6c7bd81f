//! Per-cell availability used by room placement, corridor search and wall derivation.

use serde::Serialize;

use crate::grid::Grid;
use crate::types::{Coord, WorldPos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OccupancyCell {
    pub coord: Coord,
    /// `true` while nothing (room, buffer or corridor) claims the cell.
    pub is_available: bool,
}

pub type OccupancyGrid = Grid<OccupancyCell>;

impl Grid<OccupancyCell> {
    pub fn open(
        width: usize,
        height: usize,
        depth: usize,
        cell_size: f32,
        origin: WorldPos,
    ) -> Self {
        Grid::from_fn(width, height, depth, cell_size, origin, |coord| OccupancyCell {
            coord,
            is_available: true,
        })
    }

    /// Missing cells count as unavailable.
    pub fn is_available(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|cell| cell.is_available)
    }

    pub fn set_available(&mut self, coord: Coord, available: bool) -> bool {
        match self.get_mut(coord) {
            Some(cell) => {
                cell.is_available = available;
                true
            }
            None => false,
        }
    }

    pub fn available_count(&self) -> usize {
        self.cells().filter(|cell| cell.is_available).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_grid_is_fully_available_and_cells_know_their_coordinates() {
        let grid = OccupancyGrid::open(3, 1, 2, 1.0, WorldPos::ORIGIN);
        assert_eq!(grid.available_count(), 6);
        let cell = grid.get(Coord::new(2, 0, 1)).copied();
        assert_eq!(cell, Some(OccupancyCell { coord: Coord::new(2, 0, 1), is_available: true }));
    }

    #[test]
    fn claiming_cells_and_missing_cells_are_both_unavailable() {
        let mut grid = OccupancyGrid::open(3, 1, 3, 1.0, WorldPos::ORIGIN);
        assert!(grid.set_available(Coord::new(1, 0, 1), false));
        assert!(!grid.is_available(Coord::new(1, 0, 1)));
        assert!(!grid.is_available(Coord::new(3, 0, 1)));
        assert!(!grid.set_available(Coord::new(3, 0, 1), false));
        assert_eq!(grid.available_count(), 8);
    }
}
