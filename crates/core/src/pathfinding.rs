//! Grid A* over the live occupancy grid.
//! This module exists so corridor search owns its own cost bookkeeping per query.
//! It does not mutate occupancy; carving found paths is the layout engine's job.

use crate::error::DungeonError;
use crate::grid::Grid;
use crate::occupancy::OccupancyGrid;
use crate::types::{Coord, Direction};

const DIAGONAL_COST: u32 = 14;
const STRAIGHT_COST: u32 = 10;

/// Octile-weighted distance over X and Z. Height never contributes.
pub fn distance_cost(a: Coord, b: Coord) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dz = a.z.abs_diff(b.z);
    DIAGONAL_COST * dx.min(dz) + STRAIGHT_COST * dx.abs_diff(dz)
}

/// Sum of per-step costs along consecutive cells.
pub fn path_cost(cells: &[Coord]) -> u32 {
    cells.windows(2).map(|pair| distance_cost(pair[0], pair[1])).sum()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundPath {
    /// Start to end inclusive.
    pub cells: Vec<Coord>,
    /// Accumulated G-cost of the end cell.
    pub cost: u32,
}

#[derive(Clone, Copy, Debug)]
struct PathCell {
    coord: Coord,
    g_cost: u32,
    h_cost: u32,
    came_from: Option<usize>,
}

impl PathCell {
    fn f_cost(&self) -> u32 {
        self.g_cost.saturating_add(self.h_cost)
    }
}

/// Single-use search bound to a reference occupancy grid.
///
/// Path cells are allocated per instance so every query starts from unreached costs.
pub struct Pathfinder<'a> {
    reference: &'a OccupancyGrid,
    cells: Grid<PathCell>,
    open: Vec<usize>,
    in_open: Vec<bool>,
    closed: Vec<bool>,
}

impl<'a> Pathfinder<'a> {
    pub fn new(reference: &'a OccupancyGrid) -> Self {
        let cells = Grid::from_fn(
            reference.width(),
            reference.height(),
            reference.depth(),
            reference.cell_size(),
            reference.origin(),
            |coord| PathCell { coord, g_cost: u32::MAX, h_cost: 0, came_from: None },
        );
        let len = cells.len();
        Self {
            reference,
            cells,
            open: Vec::new(),
            in_open: vec![false; len],
            closed: vec![false; len],
        }
    }

    /// Returns `Ok(None)` when the end cell cannot be reached.
    ///
    /// The start cell is never checked for availability; every other cell on the
    /// returned path, the end included, was available in the reference grid.
    pub fn find_path(
        mut self,
        start: Coord,
        end: Coord,
    ) -> Result<Option<FoundPath>, DungeonError> {
        let start_index = self.cells.index(start).ok_or(DungeonError::OutOfBounds(start))?;
        let end_index = self.cells.index(end).ok_or(DungeonError::OutOfBounds(end))?;

        let start_cell = self.cells.get_at_mut(start_index);
        start_cell.g_cost = 0;
        start_cell.h_cost = distance_cost(start, end);
        self.push_open(start_index);

        while let Some(position) = self.lowest_f_cost_position() {
            let current_index = self.open[position];
            if current_index == end_index {
                return Ok(Some(self.reconstruct(end_index)));
            }

            self.open.remove(position);
            self.in_open[current_index] = false;
            self.closed[current_index] = true;

            let current = *self.cells.get_at(current_index);
            for neighbour_index in self.walkable_neighbours(current.coord) {
                if self.closed[neighbour_index] {
                    continue;
                }
                let neighbour = self.cells.get_at_mut(neighbour_index);
                let tentative = current.g_cost + distance_cost(current.coord, neighbour.coord);
                if tentative >= neighbour.g_cost {
                    continue;
                }
                neighbour.came_from = Some(current_index);
                neighbour.g_cost = tentative;
                neighbour.h_cost = distance_cost(neighbour.coord, end);
                if !self.in_open[neighbour_index] {
                    self.push_open(neighbour_index);
                }
            }
        }

        Ok(None)
    }

    fn push_open(&mut self, index: usize) {
        self.open.push(index);
        self.in_open[index] = true;
    }

    // First minimum in insertion order wins ties.
    fn lowest_f_cost_position(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (position, &index) in self.open.iter().enumerate() {
            let f_cost = self.cells.get_at(index).f_cost();
            if best.is_none_or(|(_, best_f)| f_cost < best_f) {
                best = Some((position, f_cost));
            }
        }
        best.map(|(position, _)| position)
    }

    fn walkable_neighbours(&self, coord: Coord) -> Vec<usize> {
        let mut neighbours = Vec::with_capacity(4);
        for direction in Direction::ALL {
            let next = coord.step(direction);
            if next.x < 0
                || next.z < 0
                || next.x as usize >= self.cells.width()
                || next.z as usize >= self.cells.depth()
            {
                continue;
            }
            if !self.reference.is_available(next) {
                continue;
            }
            if let Some(index) = self.cells.index(next) {
                neighbours.push(index);
            }
        }
        neighbours
    }

    fn reconstruct(&self, end_index: usize) -> FoundPath {
        let end = self.cells.get_at(end_index);
        let mut cells = vec![end.coord];
        let mut cursor = end.came_from;
        while let Some(index) = cursor {
            let cell = self.cells.get_at(index);
            cells.push(cell.coord);
            cursor = cell.came_from;
        }
        cells.reverse();
        FoundPath { cells, cost: end.g_cost }
    }
}
