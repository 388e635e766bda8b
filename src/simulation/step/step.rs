use tracing::trace;

use super::{ephemeral, physics, FrameInput, PerfTimer, Simulation};

pub(super) fn step(sim: &mut Simulation, input: &FrameInput) {
    let perf_on = sim.perf_enabled;
    if perf_on {
        sim.perf_stats.reset();
        sim.perf_stats.particle_count = sim.field.particles.len() as u32;
    }
    let step_start = if perf_on { Some(PerfTimer::start()) } else { None };

    sim.frame += 1;

    // === PHYSICS ===
    // Brush mode pins the player ring to the mouse and skips the force pass
    if input.brush_mode {
        physics::place_brush_ring(sim, input);
    } else {
        physics::step_physics(sim, input);
    }

    // === EPHEMERAL OBJECTS ===
    ephemeral::step_ephemeral(sim, input);

    if let Some(t0) = step_start {
        sim.perf_stats.step_ms = t0.elapsed_ms();
        sim.perf_stats.brush_particles = sim.brushes.len() as u32;
        sim.perf_stats.fragments = sim.fragments.len() as u32;
        sim.perf_stats.pending_sounds = sim.sounds.len() as u32;
    }
    trace!(frame = sim.frame, brushes = sim.brushes.len(), fragments = sim.fragments.len(), "frame done");
}
