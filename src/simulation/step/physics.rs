use std::f32::consts::TAU;
use std::sync::Arc;

use crate::core::Vec2;
use crate::domain::Force;
use crate::systems::ephemeral::{resolve_brush_collisions, CollisionEnv};
use crate::systems::forces::{
    apply_heat_from_fragments, apply_mouse_attraction, apply_player_cohesion, player_centroid,
    player_mean_velocity, ParticleField,
};
use crate::systems::{integrate, IntegrateParams};

use super::{FrameInput, PerfTimer, Simulation};

/// Run `$body`, storing its wall time in `perf_stats.$field` when perf is on
macro_rules! timed {
    ($sim:expr, $field:ident, $body:expr) => {{
        if $sim.perf_enabled {
            let t0 = PerfTimer::start();
            let out = $body;
            $sim.perf_stats.$field += t0.elapsed_ms();
            out
        } else {
            $body
        }
    }};
}

fn update_player_aggregate(sim: &mut Simulation) {
    let particles = &sim.field.particles;
    sim.player_center = player_centroid(particles).unwrap_or(Vec2::ZERO);
    sim.player_velocity = player_mean_velocity(particles);
}

/// Brush mode: players form a fixed ring around the mouse
pub(super) fn place_brush_ring(sim: &mut Simulation, input: &FrameInput) {
    update_player_aggregate(sim);

    let players = sim.config.player_particles.max(1) as f32;
    let radius = sim.config.brush_ring_radius;
    let mouse = input.mouse();

    let field = Arc::make_mut(&mut sim.field);
    for p in field.particles.iter_mut().filter(|p| p.is_player) {
        let angle = p.id as f32 * TAU / players;
        p.x = mouse.x + angle.cos() * radius;
        p.y = mouse.y + angle.sin() * radius;
        p.vx = 0.0;
        p.vy = 0.0;
    }
    sim.player_center = mouse;
}

pub(super) fn step_physics(sim: &mut Simulation, input: &FrameInput) {
    update_player_aggregate(sim);

    // === GRID + DENSITY ===
    {
        let field = Arc::make_mut(&mut sim.field);
        let scratch = &mut sim.scratch;
        timed!(sim, grid_ms, field.grid.rebuild(&mut field.particles, scratch));
        timed!(sim, density_ms, field.density.rebuild(&field.particles));
    }

    let count = sim.field.particles.len();
    sim.forces.clear();
    sim.forces.resize(count, Force::ZERO);

    // === PAIRWISE FORCES (worker pool) ===
    let keys: Arc<[usize]> = sim.field.grid.active_cells().into();
    let active_cells = keys.len();
    let shards = timed!(sim, dispatch_ms, {
        let dispatch = sim.pool.dispatch(keys, &sim.field, sim.force_params);
        let shards = dispatch.active_workers();
        sim.pool.wait(dispatch);
        shards
    });
    timed!(sim, reduce_ms, sim.pool.reduce(&mut sim.forces));

    // === SEQUENTIAL CONTRIBUTORS ===
    let (width, height) = (sim.width, sim.height);
    let ParticleField { particles, grid, .. } = Arc::make_mut(&mut sim.field);
    let heated = apply_heat_from_fragments(sim.fragments.as_slice(), particles, grid, width, height);

    apply_mouse_attraction(
        particles,
        &mut sim.forces,
        input.mouse(),
        input.mouse_down,
        sim.player.sun_mode,
        sim.config.mouse_force,
    );
    apply_player_cohesion(particles, &mut sim.forces, sim.config.cohesion_force);

    // === INTEGRATION ===
    let params = IntegrateParams::from_config(&sim.config, width, height, sim.frame);
    timed!(sim, integrate_ms, integrate(particles, &sim.forces, &params));

    // === BRUSH COLLISIONS ===
    let mut env = CollisionEnv {
        player_velocity: sim.player_velocity,
        frame: sim.frame,
        fragments: &mut sim.fragments,
        sounds: &sim.sounds,
        player: &mut sim.player,
        paint_throttle: &mut sim.paint_throttle,
        rng: &mut sim.rng_state,
    };
    let t0 = sim.perf_enabled.then(PerfTimer::start);
    resolve_brush_collisions(particles, &mut sim.brushes, &mut sim.brush_grid, &mut env);

    if let Some(t0) = t0 {
        sim.perf_stats.collisions_ms = t0.elapsed_ms();
        sim.perf_stats.active_cells = active_cells as u32;
        sim.perf_stats.shards = shards as u32;
        sim.perf_stats.heated_particles = heated as u32;
    }
}
