//! Dense 3D cell storage with a world-space mapping.
//! This module exists so occupancy and pathfinding share one indexing scheme.
//! It does not own any notion of walkability.

use crate::types::{Coord, WorldPos};

#[derive(Clone, Debug)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    depth: usize,
    cell_size: f32,
    origin: WorldPos,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid with every in-bounds coordinate populated by `init`.
    pub fn from_fn(
        width: usize,
        height: usize,
        depth: usize,
        cell_size: f32,
        origin: WorldPos,
        mut init: impl FnMut(Coord) -> T,
    ) -> Self {
        debug_assert!(width > 0 && height > 0 && depth > 0);
        debug_assert!(cell_size > 0.0);
        let mut cells = Vec::with_capacity(width * height * depth);
        for z in 0..depth {
            for y in 0..height {
                for x in 0..width {
                    cells.push(init(Coord::new(x as i32, y as i32, z as i32)));
                }
            }
        }
        Self { width, height, depth, cell_size, origin, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn origin(&self) -> WorldPos {
        self.origin
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
            && (coord.z as usize) < self.depth
    }

    pub fn index(&self, coord: Coord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let (x, y, z) = (coord.x as usize, coord.y as usize, coord.z as usize);
        Some((z * self.height + y) * self.width + x)
    }

    pub fn coord_of(&self, index: usize) -> Coord {
        let x = index % self.width;
        let y = (index / self.width) % self.height;
        let z = index / (self.width * self.height);
        Coord::new(x as i32, y as i32, z as i32)
    }

    /// `None` means the coordinate has no backing cell.
    pub fn get(&self, coord: Coord) -> Option<&T> {
        self.index(coord).map(|index| &self.cells[index])
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut T> {
        self.index(coord).map(|index| &mut self.cells[index])
    }

    pub fn get_at(&self, index: usize) -> &T {
        &self.cells[index]
    }

    pub fn get_at_mut(&mut self, index: usize) -> &mut T {
        &mut self.cells[index]
    }

    /// Stores `value` at `coord`. Out-of-bounds writes are dropped and reported as `false`.
    pub fn set(&mut self, coord: Coord, value: T) -> bool {
        match self.get_mut(coord) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn world_position(&self, coord: Coord) -> WorldPos {
        self.origin
            + WorldPos::new(coord.x as f32, coord.y as f32, coord.z as f32) * self.cell_size
    }

    /// Inverse of [`Grid::world_position`], rounding to the nearest cell.
    pub fn coord_at_world(&self, pos: WorldPos) -> Coord {
        let local = pos - self.origin;
        Coord::new(
            (local.x / self.cell_size).round() as i32,
            (local.y / self.cell_size).round() as i32,
            (local.z / self.cell_size).round() as i32,
        )
    }

    pub fn get_at_world(&self, pos: WorldPos) -> Option<&T> {
        self.get(self.coord_at_world(pos))
    }

    pub fn get_at_world_mut(&mut self, pos: WorldPos) -> Option<&mut T> {
        let coord = self.coord_at_world(pos);
        self.get_mut(coord)
    }

    pub fn cells(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
