/// Timings and counters for the last frame (zeros while perf is disabled)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub(super) step_ms: f64,
    pub(super) grid_ms: f64,
    pub(super) density_ms: f64,
    pub(super) dispatch_ms: f64,
    pub(super) reduce_ms: f64,
    pub(super) integrate_ms: f64,
    pub(super) collisions_ms: f64,
    pub(super) brush_ms: f64,
    pub(super) fragments_ms: f64,

    pub(super) particle_count: u32,
    pub(super) active_cells: u32,
    pub(super) shards: u32,
    pub(super) heated_particles: u32,
    pub(super) brush_particles: u32,
    pub(super) brush_removed: u32,
    pub(super) fragments: u32,
    pub(super) meteors_spawned: u32,
    pub(super) pending_sounds: u32,
}

impl FrameStats {
    pub(crate) fn reset(&mut self) {
        *self = FrameStats::default();
    }

    pub fn step_ms(&self) -> f64 { self.step_ms }
    pub fn grid_ms(&self) -> f64 { self.grid_ms }
    pub fn density_ms(&self) -> f64 { self.density_ms }
    /// Dispatch plus wait: wall time of the parallel pairwise pass
    pub fn dispatch_ms(&self) -> f64 { self.dispatch_ms }
    pub fn reduce_ms(&self) -> f64 { self.reduce_ms }
    pub fn integrate_ms(&self) -> f64 { self.integrate_ms }
    pub fn collisions_ms(&self) -> f64 { self.collisions_ms }
    pub fn brush_ms(&self) -> f64 { self.brush_ms }
    pub fn fragments_ms(&self) -> f64 { self.fragments_ms }

    pub fn particle_count(&self) -> u32 { self.particle_count }
    pub fn active_cells(&self) -> u32 { self.active_cells }
    pub fn shards(&self) -> u32 { self.shards }
    pub fn heated_particles(&self) -> u32 { self.heated_particles }
    pub fn brush_particles(&self) -> u32 { self.brush_particles }
    pub fn brush_removed(&self) -> u32 { self.brush_removed }
    pub fn fragments(&self) -> u32 { self.fragments }
    pub fn meteors_spawned(&self) -> u32 { self.meteors_spawned }
    pub fn pending_sounds(&self) -> u32 { self.pending_sounds }
}
