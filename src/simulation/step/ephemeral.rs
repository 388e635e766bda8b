use crate::systems::ephemeral::BrushEnv;

use super::{FrameInput, PerfTimer, Simulation};

pub(super) fn step_ephemeral(sim: &mut Simulation, input: &FrameInput) {
    let perf_on = sim.perf_enabled;
    let t0 = perf_on.then(PerfTimer::start);

    // Meteor showers
    let meteors = sim.meteors.update(
        input.silent,
        sim.config.frame_dt,
        sim.width,
        &mut sim.brushes,
        &mut sim.rng_state,
    );

    // Painting follows the player centre (the mouse in brush mode)
    sim.stroke.update(
        input.brush_mode && input.painting,
        input.brush_effect,
        sim.player_center,
        &mut sim.brushes,
        &mut sim.rng_state,
    );

    let mut env = BrushEnv {
        brush_mode: input.brush_mode,
        world_height: sim.height,
        particles: &sim.field.particles,
        density: &sim.field.density,
        fragments: &mut sim.fragments,
        sounds: &sim.sounds,
        player: &mut sim.player,
        rng: &mut sim.rng_state,
    };
    let removed = sim.brushes.update(&mut env);

    let t1 = perf_on.then(PerfTimer::start);
    sim.fragments.update();
    sim.player.tick();

    if let (Some(t0), Some(t1)) = (t0, t1) {
        sim.perf_stats.fragments_ms = t1.elapsed_ms();
        sim.perf_stats.brush_ms = t0.elapsed_ms() - sim.perf_stats.fragments_ms;
        sim.perf_stats.meteors_spawned = meteors as u32;
        sim.perf_stats.brush_removed = removed as u32;
    }
}
