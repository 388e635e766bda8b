//! Spatial Grid - uniform bucket grid over the world rectangle
//!
//! Rebuilt every frame with a counting sort that physically reorders the
//! particle buffer into cell-contiguous runs:
//!
//!   cell_start[c] .. cell_start[c] + cell_count[c]  ==  particles in cell c
//!
//! Any index into the particle buffer is invalidated by `rebuild`; only
//! `Particle::id` survives.

mod indexing;
mod rebuild;

use std::ops::Range;

#[derive(Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    inv_cell_size: f32,
    cols: usize,
    rows: usize,

    cell_start: Vec<usize>,
    cell_count: Vec<usize>,
    // Next free slot per cell during rebuild (copy of cell_start)
    cursor: Vec<usize>,
    // Non-empty cells in ascending order, refreshed by rebuild
    active: Vec<usize>,
}

impl SpatialGrid {
    /// Grid covering `width x height` with square cells of `cell_size`.
    ///
    /// A non-positive cell size is a programmer error (configs are
    /// validated before they get here).
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "spatial grid cell size must be positive");
        let mut grid = Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cols: 0,
            rows: 0,
            cell_start: Vec::new(),
            cell_count: Vec::new(),
            cursor: Vec::new(),
            active: Vec::new(),
        };
        grid.resize(width, height);
        grid
    }

    /// Recompute columns/rows for a new world size and reset bookkeeping.
    ///
    /// One spare row and column absorb positions sitting exactly on the
    /// far edge.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.cols = (width.max(0.0) * self.inv_cell_size).ceil() as usize + 1;
        self.rows = (height.max(0.0) * self.inv_cell_size).ceil() as usize + 1;

        let cells = self.cols * self.rows;
        self.cell_start.clear();
        self.cell_start.resize(cells, 0);
        self.cell_count.clear();
        self.cell_count.resize(cells, 0);
        self.cursor.clear();
        self.cursor.resize(cells, 0);
        self.active.clear();
    }

    #[inline]
    pub fn cols(&self) -> usize { self.cols }

    #[inline]
    pub fn rows(&self) -> usize { self.rows }

    #[inline]
    pub fn cell_size(&self) -> f32 { self.cell_size }

    #[inline]
    pub fn inv_cell_size(&self) -> f32 { self.inv_cell_size }

    #[inline]
    pub fn total_cells(&self) -> usize { self.cols * self.rows }

    /// Offsets into the reordered particle buffer, one per cell
    pub fn cell_starts(&self) -> &[usize] { &self.cell_start }

    pub fn cell_counts(&self) -> &[usize] { &self.cell_count }

    /// Range of particle slots belonging to `cell`
    #[inline]
    pub fn cell_range(&self, cell: usize) -> Range<usize> {
        let start = *fast!(self.cell_start, [cell]);
        start..start + *fast!(self.cell_count, [cell])
    }

    /// Every non-empty cell, ascending
    pub fn active_cells(&self) -> &[usize] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::{range_f32, xorshift32};
    use crate::domain::Particle;

    fn scatter(n: usize, w: f32, h: f32, seed: u32) -> Vec<Particle> {
        let mut rng = seed;
        (0..n)
            .map(|i| {
                let x = range_f32(&mut rng, -30.0, w + 30.0);
                let y = range_f32(&mut rng, -30.0, h + 30.0);
                Particle::new(x, y, xorshift32(&mut rng) & 1 == 0, i as u32)
            })
            .collect()
    }

    #[test]
    fn resize_covers_rectangle_with_spare_cells() {
        let grid = SpatialGrid::new(100.0, 60.0, 20.0);
        assert_eq!(grid.cols(), 6);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.cell_counts().len(), 24);
    }

    #[test]
    fn resize_clears_stale_counts() {
        let mut grid = SpatialGrid::new(200.0, 200.0, 20.0);
        let mut particles = scatter(50, 200.0, 200.0, 3);
        let mut scratch = Vec::new();
        grid.rebuild(&mut particles, &mut scratch);
        assert!(!grid.active_cells().is_empty());

        grid.resize(80.0, 80.0);
        assert_eq!(grid.cell_counts().len(), grid.total_cells());
        assert!(grid.cell_counts().iter().all(|&c| c == 0));
        assert!(grid.active_cells().is_empty());
    }

    #[test]
    fn rebuild_places_every_particle_exactly_once() {
        let mut grid = SpatialGrid::new(400.0, 300.0, 40.0);
        let mut particles = scatter(1500, 400.0, 300.0, 99);
        let mut scratch = Vec::new();
        grid.rebuild(&mut particles, &mut scratch);

        let mut seen = vec![0u32; 1500];
        for cell in 0..grid.total_cells() {
            for slot in grid.cell_range(cell) {
                let p = &particles[slot];
                assert_eq!(grid.cell_of(p.x, p.y), cell);
                seen[p.id as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn active_cells_are_ascending_and_non_empty() {
        let mut grid = SpatialGrid::new(400.0, 300.0, 40.0);
        let mut particles = scatter(300, 400.0, 300.0, 5);
        let mut scratch = Vec::new();
        grid.rebuild(&mut particles, &mut scratch);

        let active = grid.active_cells();
        assert!(active.windows(2).all(|w| w[0] < w[1]));
        assert!(active.iter().all(|&c| grid.cell_counts()[c] > 0));
        let total: usize = active.iter().map(|&c| grid.cell_counts()[c]).sum();
        assert_eq!(total, 300);
    }

    #[test]
    fn out_of_range_positions_clamp_to_edge_cells() {
        let grid = SpatialGrid::new(100.0, 100.0, 20.0);
        assert_eq!(grid.cell_coords(-50.0, -1.0), (0, 0));
        assert_eq!(grid.cell_coords(1e9, 1e9), (grid.cols() - 1, grid.rows() - 1));
        assert_eq!(grid.cell_coords(f32::NAN, 25.0), (0, 1));
    }

    #[test]
    fn neighborhood_is_clipped_at_borders() {
        let grid = SpatialGrid::new(100.0, 100.0, 20.0);
        assert_eq!(grid.neighborhood(0, 0).count(), 4);
        assert_eq!(grid.neighborhood(2, 0).count(), 6);
        assert_eq!(grid.neighborhood(2, 2).count(), 9);
    }
}
