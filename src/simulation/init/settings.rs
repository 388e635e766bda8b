use std::sync::Arc;

use tracing::info;

use crate::domain::Force;

use super::perf_stats::FrameStats;
use super::Simulation;

pub(super) fn enable_perf_metrics(sim: &mut Simulation, enabled: bool) {
    sim.perf_enabled = enabled;
    if !enabled {
        sim.perf_stats.reset();
    }
}

pub(super) fn perf_stats(sim: &Simulation) -> FrameStats {
    sim.perf_stats.clone()
}

/// Scale positions into the new world, stop every particle and resize
/// the grids. Non-positive sizes are ignored.
pub(super) fn resize(sim: &mut Simulation, width: f32, height: f32) {
    if !(width > 0.0 && height > 0.0) {
        return;
    }
    let sx = width / sim.width;
    let sy = height / sim.height;

    let field = Arc::make_mut(&mut sim.field);
    for p in &mut field.particles {
        p.x *= sx;
        p.y *= sy;
        p.vx = 0.0;
        p.vy = 0.0;
    }
    field.grid.resize(width, height);
    field.density.resize(width, height);
    sim.brush_grid.resize(width, height);
    sim.forces.fill(Force::ZERO);

    info!(from_w = sim.width, from_h = sim.height, width, height, "simulation resized");
    sim.width = width;
    sim.height = height;
}
