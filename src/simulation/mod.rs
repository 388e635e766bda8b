//! Simulation - the frame driver
//!
//! Owns every piece of per-run state (particles, grids, worker pool,
//! brush particles, fragments, player status) and advances it one frame
//! at a time. Nothing is global: collaborators (render, audio, input) talk
//! to the simulation through [`FrameInput`], the read accessors and the
//! shared [`SoundQueue`].
//!
//! Frame order:
//! 1. physics   - grid rebuild, density, pooled pairwise forces, heat,
//!                mouse, cohesion, integration, brush collisions
//!                (replaced by the player ring while in brush mode)
//! 2. ephemeral - meteors, painting, brush update, fragments, player timers

use std::sync::Arc;

use crate::core::Vec2;
use crate::domain::{EngineError, Force, Particle, PlayerState, SimConfig};
use crate::spatial::BrushGrid;
use crate::systems::ephemeral::{
    BrushParticle, BrushSet, BrushStroke, Fragment, FragmentSet, MeteorSpawner, SoundThrottle,
};
use crate::systems::{ForceParams, ParticleField, SoundQueue, WorkerPool};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
#[path = "step/step.rs"]
mod step;
#[path = "step/physics.rs"]
mod physics;
#[path = "step/ephemeral.rs"]
mod ephemeral;
mod input;

pub use input::FrameInput;
pub use perf_stats::FrameStats;

use perf_timer::PerfTimer;

/// The whole simulation state
pub struct Simulation {
    config: SimConfig,
    width: f32,
    height: f32,

    // Particles
    field: Arc<ParticleField>,
    scratch: Vec<Particle>,
    forces: Vec<Force>,
    force_params: ForceParams,
    pool: WorkerPool,

    // Ephemeral objects
    brushes: BrushSet,
    brush_grid: BrushGrid,
    fragments: FragmentSet,
    stroke: BrushStroke,
    meteors: MeteorSpawner,

    // Player
    player: PlayerState,
    player_center: Vec2,
    player_velocity: Vec2,

    sounds: Arc<SoundQueue>,
    paint_throttle: SoundThrottle,

    // State
    frame: u64,
    rng_state: u32,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: FrameStats,
}

impl Simulation {
    /// Validate `config`, seed the particle pool and start the workers
    pub fn new(config: SimConfig) -> Result<Self, EngineError> {
        init::create_simulation(config)
    }

    /// Start from a caller-supplied particle set (ids must be `0..len`)
    pub fn with_particles(config: SimConfig, particles: Vec<Particle>) -> Result<Self, EngineError> {
        init::create_simulation_with_particles(config, particles)
    }

    /// Advance one frame
    pub fn step(&mut self, input: &FrameInput) {
        step::step(self, input);
    }

    /// Rescale particle positions to a new world size
    pub fn resize(&mut self, width: f32, height: f32) {
        settings::resize(self, width, height);
    }

    pub fn config(&self) -> &SimConfig { &self.config }

    pub fn width(&self) -> f32 { self.width }

    pub fn height(&self) -> f32 { self.height }

    pub fn frame(&self) -> u64 { self.frame }

    /// Particles in cell order; use `id` for identity across frames
    pub fn particles(&self) -> &[Particle] { &self.field.particles }

    pub fn particle_count(&self) -> usize { self.field.particles.len() }

    pub fn brush_particles(&self) -> &[BrushParticle] { self.brushes.as_slice() }

    pub fn fragments(&self) -> &[Fragment] { self.fragments.as_slice() }

    pub fn player_state(&self) -> &PlayerState { &self.player }

    /// Player centroid at the start of the last frame (mouse in brush mode)
    pub fn player_center(&self) -> Vec2 { self.player_center }

    pub fn player_velocity(&self) -> Vec2 { self.player_velocity }

    /// Forces applied during the last physics frame, indexed like `particles()`
    pub fn forces(&self) -> &[Force] { &self.forces }

    /// Shared queue the audio collaborator drains
    pub fn sound_queue(&self) -> Arc<SoundQueue> { Arc::clone(&self.sounds) }

    pub fn worker_count(&self) -> usize { self.pool.worker_count() }

    /// Add a brush particle; `false` once the brush cap is reached
    pub fn spawn_brush(&mut self, particle: BrushParticle) -> bool {
        self.brushes.push(particle)
    }

    /// Add a fragment; `false` once the fragment cap is reached
    pub fn spawn_fragment(&mut self, fragment: Fragment) -> bool {
        self.fragments.push(fragment)
    }

    pub fn spawn_explosion(&mut self, x: f32, y: f32) -> usize {
        self.fragments.spawn_explosion(x, y, &mut self.rng_state)
    }

    pub fn spawn_rainbow(&mut self, x: f32, y: f32, intensity: f32) -> usize {
        let t = self.frame as f32 * 0.016;
        self.fragments.spawn_rainbow(x, y, t, intensity, &mut self.rng_state)
    }

    /// Drop a meteor cloud centred on (x, y)
    pub fn spawn_meteor(&mut self, x: f32, y: f32) -> usize {
        crate::systems::ephemeral::spawn_meteor_drop(x, y, &mut self.brushes, &mut self.rng_state)
    }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last frame's perf snapshot (zeros when perf disabled)
    pub fn perf_stats(&self) -> FrameStats {
        settings::perf_stats(self)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
