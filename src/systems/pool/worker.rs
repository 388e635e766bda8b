use std::ops::Range;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use crate::domain::Force;
use crate::systems::forces::{accumulate_cell_forces, ForceParams, ParticleField};

/// One shard of one dispatch
pub(super) struct Job {
    pub generation: u64,
    pub keys: Arc<[usize]>,
    pub range: Range<usize>,
    pub field: Arc<ParticleField>,
    pub params: ForceParams,
    /// The worker's private accumulator, lent for the duration of the job
    pub forces: Vec<Force>,
}

pub(super) enum Command {
    Run(Job),
    Shutdown,
}

pub(super) struct Completion {
    pub worker: usize,
    pub generation: u64,
    pub forces: Vec<Force>,
}

/// Worker thread body: run jobs until told to stop or the pool goes away
pub(super) fn run(id: usize, commands: Receiver<Command>, done: Sender<Completion>) {
    debug!(worker = id, "force worker started");
    while let Ok(command) = commands.recv() {
        let job = match command {
            Command::Run(job) => job,
            Command::Shutdown => break,
        };
        let Job { generation, keys, range, field, params, mut forces } = job;

        forces.clear();
        forces.resize(field.particles.len(), Force::ZERO);
        accumulate_cell_forces(&keys[range], field.view(), &params, &mut forces);

        // release the shared field before reporting, the caller reclaims it
        drop(field);
        drop(keys);

        if done.send(Completion { worker: id, generation, forces }).is_err() {
            break;
        }
    }
    debug!(worker = id, "force worker stopped");
}
