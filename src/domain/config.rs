//! Simulation settings.
//!
//! Every tunable constant lives here. Defaults reproduce the shipped game
//! (1280x720, 2000 particles, 300 of them in the player cluster). A JSON
//! document may override any subset of fields.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimConfig {
    // World
    pub width: f32,
    pub height: f32,
    pub total_particles: usize,
    pub player_particles: usize,

    // Integration
    /// Distance kept between particles and the walls
    pub wall_radius: f32,
    pub damping: f32,
    pub gravity: f32,
    pub boiling_point: f32,
    /// Temperature lost per frame by water particles
    pub cooling_rate: f32,

    // Pairwise repulsion
    pub interaction_radius: f32,
    pub player_water_interaction_radius: f32,
    pub repulsion_force: f32,
    pub player_water_repulsion_multiplier: f32,
    /// Pairs closer than sqrt(epsilon) are treated as coincident and skipped
    pub min_distance_sq: f32,
    /// Spatial grid cell edge; must cover the largest interaction radius
    pub grid_cell_size: f32,

    // Density field
    /// Coarse density cell edge in world units
    pub density_scale: usize,
    pub density_high_threshold: f32,
    pub density_sample_cap: usize,
    pub density_sample_radius: f32,
    pub density_separation: f32,
    pub density_gradient: f32,

    // Player cluster
    pub mouse_force: f32,
    pub cohesion_force: f32,
    /// Ring radius used while the cluster acts as a paint brush
    pub brush_ring_radius: f32,

    // Ephemeral objects
    pub brush_grid_cell_size: f32,
    pub max_brush_particles: usize,
    pub max_fragments: usize,
    pub max_pending_sounds: usize,

    // Runtime
    /// Worker threads for the force pool (0 = one per available core)
    pub worker_threads: usize,
    pub seed: u32,
    /// Seconds per frame, used by the meteor spawner clock
    pub frame_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            total_particles: 2000,
            player_particles: 300,

            wall_radius: 20.0,
            damping: 0.983,
            gravity: 0.05,
            boiling_point: 0.8,
            cooling_rate: 0.009,

            interaction_radius: 20.0,
            player_water_interaction_radius: 40.0,
            repulsion_force: 0.5,
            player_water_repulsion_multiplier: 8.0,
            min_distance_sq: 0.001,
            grid_cell_size: 40.0,

            density_scale: 8,
            density_high_threshold: 12.0,
            density_sample_cap: 24,
            density_sample_radius: 50.0,
            density_separation: 0.025,
            density_gradient: 0.0005,

            mouse_force: 0.2,
            cohesion_force: 0.02,
            brush_ring_radius: 35.0,

            brush_grid_cell_size: 100.0,
            max_brush_particles: 10_000,
            max_fragments: 20_000,
            max_pending_sounds: 100,

            worker_threads: 0,
            seed: 12345,
            frame_dt: 1.0 / 90.0,
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) camelCase JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn water_particles(&self) -> usize {
        self.total_particles - self.player_particles
    }

    /// Resolved worker count
    pub fn workers(&self) -> usize {
        if self.worker_threads > 0 {
            return self.worker_threads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }

    /// Check invariants that must hold for the whole run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::WorldSize { width: self.width, height: self.height });
        }
        if self.total_particles == 0 {
            return Err(ConfigError::NoParticles);
        }
        if self.player_particles > self.total_particles {
            return Err(ConfigError::TooManyPlayers {
                players: self.player_particles,
                total: self.total_particles,
            });
        }
        for (name, value) in [
            ("interactionRadius", self.interaction_radius),
            ("playerWaterInteractionRadius", self.player_water_interaction_radius),
            ("gridCellSize", self.grid_cell_size),
            ("brushGridCellSize", self.brush_grid_cell_size),
            ("frameDt", self.frame_dt),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        let radius = self.interaction_radius.max(self.player_water_interaction_radius);
        if self.grid_cell_size < radius {
            return Err(ConfigError::CellSmallerThanRadius { cell_size: self.grid_cell_size, radius });
        }
        if self.density_scale == 0 {
            return Err(ConfigError::DensityScale);
        }
        Ok(())
    }
}
