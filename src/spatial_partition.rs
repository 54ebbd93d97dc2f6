//! Spatial grid partitioning for overlap queries.
//!
//! The collision pass rebuilds this grid from enemy positions every tick and
//! asks it for candidates near each weapon instance and near the player,
//! replacing the O(weapons × enemies) brute-force scan.
//!
//! ## Cell Size Choice
//!
//! Cell size (`grid_cell_size` in `SimConfig`) should be close to the largest
//! overlap distance queried. With the default of 64 units:
//!   - a shield (radius 20) against an enemy (radius 14) checks a 3×3 area
//!   - the player (radius 16) against an enemy checks a 3×3 area

use bevy::prelude::*;
use std::collections::HashMap;

/// Uniform hash grid of item indices.
///
/// Indices are whatever the caller inserted (the collision pass uses slots in
/// the enemy list); the grid never dereferences them.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    /// Map from cell coordinates to index list
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(crate::constants::GRID_CELL_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: if cell_size.is_finite() && cell_size > 0.0 {
                cell_size
            } else {
                crate::constants::GRID_CELL_SIZE
            },
            cells: HashMap::new(),
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Compute grid cell coordinates for a world position
    fn world_to_cell(&self, pos: Vec2) -> (i32, i32) {
        let x = (pos.x / self.cell_size).floor() as i32;
        let y = (pos.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Insert an index at a position. Call after clear() for bulk rebuild.
    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let cell = self.world_to_cell(pos);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Clear all grid data (call before each tick's rebuild)
    pub fn clear(&mut self) {
        // Retain allocations but clear contents
        for v in self.cells.values_mut() {
            v.clear();
        }
        self.cells.retain(|_, v| !v.is_empty());
    }

    /// Clear and re-insert every position, using its position in the iterator
    /// as its index.
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Vec2>) {
        self.clear();
        for (index, pos) in positions.into_iter().enumerate() {
            self.insert(index, pos);
        }
    }

    /// All indices in cells overlapping the given circle, in ascending order.
    ///
    /// Results include items outside the circle; callers do the exact
    /// distance check themselves.
    pub fn candidates(&self, pos: Vec2, max_distance: f32) -> Vec<usize> {
        let cell = self.world_to_cell(pos);
        let cells_to_check = self.radius_in_cells(max_distance);

        let mut found = Vec::new();
        for dx in -cells_to_check..=cells_to_check {
            for dy in -cells_to_check..=cells_to_check {
                if let Some(indices) = self.cells.get(&(cell.0 + dx, cell.1 + dy)) {
                    found.extend_from_slice(indices);
                }
            }
        }
        found.sort_unstable();
        found
    }

    /// Compute how many cells in each direction we need to check for a given max distance
    fn radius_in_cells(&self, max_distance: f32) -> i32 {
        ((max_distance / self.cell_size).ceil() as i32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_items_are_candidates_and_far_items_are_not() {
        let mut grid = SpatialGrid::new(64.0);
        grid.rebuild([Vec2::ZERO, Vec2::new(30.0, 0.0), Vec2::new(1000.0, 1000.0)]);
        let found = grid.candidates(Vec2::new(5.0, 5.0), 30.0);
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn query_across_cell_boundary_finds_neighbour() {
        let mut grid = SpatialGrid::new(64.0);
        grid.rebuild([Vec2::new(-1.0, 0.0)]);
        assert_eq!(grid.candidates(Vec2::new(1.0, 0.0), 5.0), vec![0]);
    }

    #[test]
    fn rebuild_discards_previous_contents() {
        let mut grid = SpatialGrid::new(64.0);
        grid.rebuild([Vec2::ZERO, Vec2::ZERO]);
        grid.rebuild([Vec2::new(500.0, 500.0)]);
        assert!(grid.candidates(Vec2::ZERO, 10.0).is_empty());
    }

    #[test]
    fn invalid_cell_size_uses_default() {
        let grid = SpatialGrid::new(0.0);
        assert_eq!(grid.cell_size(), crate::constants::GRID_CELL_SIZE);
    }
}
