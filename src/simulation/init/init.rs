use std::f32::consts::TAU;
use std::sync::Arc;

use tracing::info;

use crate::core::random::below;
use crate::core::Vec2;
use crate::domain::{EngineError, Force, Particle, PlayerState, SimConfig};
use crate::spatial::{BrushGrid, DensityField, SpatialGrid};
use crate::systems::ephemeral::{
    BrushSet, BrushStroke, FragmentSet, MeteorSpawner, SoundThrottle, PAINT_SOUND_INTERVAL,
};
use crate::systems::{ForceParams, ParticleField, SoundQueue, WorkerPool};

use super::perf_stats::FrameStats;
use super::Simulation;

/// Player particles start within this distance of the world centre
const PLAYER_SPAWN_RADIUS: u32 = 40;

pub(super) fn create_simulation(config: SimConfig) -> Result<Simulation, EngineError> {
    config.validate()?;
    let mut rng = config.seed;
    let particles = initial_particles(&config, &mut rng);
    build(config, particles, rng)
}

pub(super) fn create_simulation_with_particles(
    config: SimConfig,
    particles: Vec<Particle>,
) -> Result<Simulation, EngineError> {
    config.validate()?;
    check_ids(&particles)?;
    let rng = config.seed;
    build(config, particles, rng)
}

/// Player cluster around the centre followed by uniformly scattered water;
/// ids are assigned in creation order.
pub(super) fn initial_particles(config: &SimConfig, rng: &mut u32) -> Vec<Particle> {
    let players = config.player_particles;
    let mut particles = Vec::with_capacity(config.total_particles);
    let cx = config.width / 2.0;
    let cy = config.height / 2.0;

    for i in 0..players {
        let angle = i as f32 / players as f32 * TAU;
        let r = below(rng, PLAYER_SPAWN_RADIUS) as f32;
        let id = particles.len() as u32;
        particles.push(Particle::player(cx + angle.cos() * r, cy + angle.sin() * r, id));
    }
    for _ in 0..config.water_particles() {
        let x = below(rng, config.width as u32) as f32;
        let y = below(rng, config.height as u32) as f32;
        let id = particles.len() as u32;
        particles.push(Particle::water(x, y, id));
    }
    particles
}

/// Ids must be a permutation of `0..len`
fn check_ids(particles: &[Particle]) -> Result<(), EngineError> {
    let count = particles.len();
    if count == 0 {
        return Err(EngineError::ParticleIds { count });
    }
    let mut seen = vec![false; count];
    for p in particles {
        let id = p.id as usize;
        if id >= count || seen[id] {
            return Err(EngineError::ParticleIds { count });
        }
        seen[id] = true;
    }
    Ok(())
}

fn build(config: SimConfig, particles: Vec<Particle>, mut rng: u32) -> Result<Simulation, EngineError> {
    let (width, height) = (config.width, config.height);
    let grid = SpatialGrid::new(width, height, config.grid_cell_size);
    let density = DensityField::new(width, height, config.density_scale);
    let pool = WorkerPool::new(config.workers())?;

    info!(
        particles = particles.len(),
        players = particles.iter().filter(|p| p.is_player).count(),
        workers = pool.worker_count(),
        cols = grid.cols(),
        rows = grid.rows(),
        "simulation created"
    );

    let count = particles.len();
    let meteors = MeteorSpawner::new(&mut rng);
    Ok(Simulation {
        force_params: ForceParams::from_config(&config),
        field: Arc::new(ParticleField::new(particles, grid, density)),
        scratch: Vec::with_capacity(count),
        forces: vec![Force::ZERO; count],
        pool,

        brushes: BrushSet::new(config.max_brush_particles),
        brush_grid: BrushGrid::new(width, height, config.brush_grid_cell_size),
        fragments: FragmentSet::new(config.max_fragments),
        stroke: BrushStroke::new(Vec2::new(width / 2.0, height / 2.0)),
        meteors,

        player: PlayerState::default(),
        player_center: Vec2::ZERO,
        player_velocity: Vec2::ZERO,

        sounds: SoundQueue::shared(config.max_pending_sounds),
        paint_throttle: SoundThrottle::new(PAINT_SOUND_INTERVAL),

        frame: 0,
        rng_state: rng,

        perf_enabled: false,
        perf_stats: FrameStats::default(),

        width,
        height,
        config,
    })
}
