//! Density Field - coarse histogram of water particles
//!
//! Resolution is independent of the spatial grid (one cell per
//! `scale x scale` world units). Rebuilt from scratch every frame and only
//! read by the force model and the falling-drop impact test.

use crate::core::Vec2;
use crate::domain::Particle;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Below this many particles the serial histogram wins over rayon's
/// per-chunk buffers.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_PARTICLES: usize = 16_384;

#[derive(Clone)]
pub struct DensityField {
    scale: usize,
    inv_scale: f32,
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl DensityField {
    pub fn new(world_width: f32, world_height: f32, scale: usize) -> Self {
        assert!(scale > 0, "density scale must be at least 1");
        let mut field = Self {
            scale,
            inv_scale: 1.0 / scale as f32,
            width: 0,
            height: 0,
            cells: Vec::new(),
        };
        field.resize(world_width, world_height);
        field
    }

    pub fn resize(&mut self, world_width: f32, world_height: f32) {
        self.width = world_width.max(0.0) as usize / self.scale;
        self.height = world_height.max(0.0) as usize / self.scale;
        self.cells.clear();
        self.cells.resize(self.width * self.height, 0.0);
    }

    #[inline]
    pub fn width(&self) -> usize { self.width }

    #[inline]
    pub fn height(&self) -> usize { self.height }

    #[inline]
    pub fn scale(&self) -> usize { self.scale }

    pub fn cells(&self) -> &[f32] { &self.cells }

    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// Coarse cell for a world position; positions outside the field
    /// are not counted.
    #[inline]
    pub fn cell_coords(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let bx = (x * self.inv_scale).floor();
        let by = (y * self.inv_scale).floor();
        if bx >= 0.0 && by >= 0.0 && (bx as usize) < self.width && (by as usize) < self.height {
            Some((bx as usize, by as usize))
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, bx: usize, by: usize) -> f32 {
        *fast!(self.cells, [by * self.width + bx])
    }

    /// Density at a world position (0 outside)
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        match self.cell_coords(x, y) {
            Some((bx, by)) => self.get(bx, by),
            None => 0.0,
        }
    }

    /// Interior cells have all four axis neighbours
    #[inline]
    pub fn is_interior(&self, bx: usize, by: usize) -> bool {
        bx > 0 && by > 0 && bx + 1 < self.width && by + 1 < self.height
    }

    /// Central-difference gradient (unscaled); interior cells only
    #[inline]
    pub fn gradient(&self, bx: usize, by: usize) -> Vec2 {
        debug_assert!(self.is_interior(bx, by));
        Vec2::new(
            self.get(bx + 1, by) - self.get(bx - 1, by),
            self.get(bx, by + 1) - self.get(bx, by - 1),
        )
    }

    /// Count water particles per coarse cell. Player particles are ignored.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        #[cfg(feature = "parallel")]
        {
            if particles.len() >= PARALLEL_MIN_PARTICLES {
                self.rebuild_parallel(particles);
                return;
            }
        }
        self.rebuild_serial(particles);
    }

    fn rebuild_serial(&mut self, particles: &[Particle]) {
        self.clear();
        for p in particles.iter().filter(|p| !p.is_player) {
            if let Some((bx, by)) = self.cell_coords(p.x, p.y) {
                self.cells[by * self.width + bx] += 1.0;
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn rebuild_parallel(&mut self, particles: &[Particle]) {
        let len = self.cells.len();
        let this = &*self;
        let summed = particles
            .par_chunks(4096)
            .fold(
                || vec![0.0f32; len],
                |mut acc, chunk| {
                    for p in chunk.iter().filter(|p| !p.is_player) {
                        if let Some((bx, by)) = this.cell_coords(p.x, p.y) {
                            acc[by * this.width + bx] += 1.0;
                        }
                    }
                    acc
                },
            )
            .reduce(
                || vec![0.0f32; len],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            );
        self.cells = summed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_water_particles() {
        let mut field = DensityField::new(64.0, 64.0, 8);
        let particles = vec![
            Particle::water(10.0, 10.0, 0),
            Particle::water(12.0, 13.0, 1),
            Particle::player(11.0, 11.0, 2),
            Particle::water(40.0, 40.0, 3),
        ];
        field.rebuild(&particles);
        assert_eq!(field.get(1, 1), 2.0);
        assert_eq!(field.get(5, 5), 1.0);
        assert_eq!(field.cells().iter().sum::<f32>(), 3.0);
    }

    #[test]
    fn rebuild_starts_from_zero() {
        let mut field = DensityField::new(64.0, 64.0, 8);
        let particles = vec![Particle::water(10.0, 10.0, 0)];
        field.rebuild(&particles);
        field.rebuild(&particles);
        assert_eq!(field.get(1, 1), 1.0);
    }

    #[test]
    fn outside_positions_are_dropped() {
        let mut field = DensityField::new(64.0, 64.0, 8);
        let particles = vec![Particle::water(-1.0, 10.0, 0), Particle::water(64.0, 10.0, 1)];
        field.rebuild(&particles);
        assert_eq!(field.cells().iter().sum::<f32>(), 0.0);
        assert_eq!(field.sample(-1.0, 10.0), 0.0);
    }

    #[test]
    fn gradient_points_towards_denser_side() {
        let mut field = DensityField::new(32.0, 32.0, 8);
        let particles: Vec<Particle> = (0..5).map(|i| Particle::water(20.0, 12.0, i)).collect();
        field.rebuild(&particles);
        let g = field.gradient(1, 1);
        assert!(g.x > 0.0);
        assert_eq!(g.y, 0.0);
    }
}
