//! Force Model - pure force contributors for one frame
//!
//! - pairwise - short-range repulsion over the 3x3 cell neighbourhood
//!              (the expensive part, run inside the worker pool)
//! - density  - surface-tension / smoothing term from the density field
//! - player   - cluster cohesion and mouse attraction
//! - heat     - heat and velocity kicks from hot fragments

mod density;
mod heat;
mod pairwise;
mod player;

pub use density::density_term;
pub use heat::{apply_heat_from_fragments, HEAT_RADIUS, HEAT_TEMPERATURE};
pub use pairwise::{accumulate_all, accumulate_cell_forces, pair_push};
pub use player::{
    apply_mouse_attraction, apply_player_cohesion, player_centroid, player_mean_velocity,
};

use crate::domain::{Particle, SimConfig};
use crate::spatial::{DensityField, SpatialGrid};

/// Frame state the force pass reads: the cell-ordered particle buffer,
/// the grid describing that order and the density field.
///
/// Shared with the worker pool behind an `Arc` for the duration of one
/// dispatch; the driver is the only writer outside that window.
#[derive(Clone)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    pub grid: SpatialGrid,
    pub density: DensityField,
}

impl ParticleField {
    pub fn new(particles: Vec<Particle>, grid: SpatialGrid, density: DensityField) -> Self {
        Self { particles, grid, density }
    }

    /// Reorder particles by cell and recount the density field
    pub fn rebuild(&mut self, scratch: &mut Vec<Particle>) {
        self.grid.rebuild(&mut self.particles, scratch);
        self.density.rebuild(&self.particles);
    }

    pub fn view(&self) -> ForceView<'_> {
        ForceView {
            particles: &self.particles,
            grid: &self.grid,
            density: &self.density,
        }
    }
}

/// Borrowed, read-only form of [`ParticleField`]
#[derive(Clone, Copy)]
pub struct ForceView<'a> {
    pub particles: &'a [Particle],
    pub grid: &'a SpatialGrid,
    pub density: &'a DensityField,
}

/// Coefficients for the pairwise and density terms, precomputed from config
#[derive(Clone, Copy, Debug)]
pub struct ForceParams {
    pub interaction_radius: f32,
    pub player_radius: f32,
    pub interaction_radius_sq: f32,
    pub player_radius_sq: f32,
    pub coeff_same: f32,
    pub coeff_mixed: f32,
    pub min_distance_sq: f32,

    pub density_high_threshold: f32,
    pub density_sample_cap: usize,
    pub density_sample_radius_sq: f32,
    pub density_separation: f32,
    pub density_gradient: f32,
}

impl ForceParams {
    pub fn from_config(config: &SimConfig) -> Self {
        let coeff_same = config.repulsion_force * 0.01;
        Self {
            interaction_radius: config.interaction_radius,
            player_radius: config.player_water_interaction_radius,
            interaction_radius_sq: config.interaction_radius * config.interaction_radius,
            player_radius_sq: config.player_water_interaction_radius
                * config.player_water_interaction_radius,
            coeff_same,
            coeff_mixed: coeff_same * config.player_water_repulsion_multiplier,
            min_distance_sq: config.min_distance_sq,

            density_high_threshold: config.density_high_threshold,
            density_sample_cap: config.density_sample_cap,
            density_sample_radius_sq: config.density_sample_radius * config.density_sample_radius,
            density_separation: config.density_separation,
            density_gradient: config.density_gradient,
        }
    }
}

impl Default for ForceParams {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}
