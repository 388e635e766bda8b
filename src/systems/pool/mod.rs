//! Force Worker Pool - fan-out / fan-in over long-lived threads
//!
//! N worker threads are started once and live as long as the pool. Each
//! dispatch hands every worker one contiguous shard of active cell keys
//! plus a shared, read-only [`ParticleField`]. Workers accumulate into a
//! private force buffer that travels with the job and comes back with the
//! completion, so no buffer is ever shared between threads.
//!
//! Exactly one dispatch may be in flight: [`WorkerPool::dispatch`] returns a
//! [`Dispatch`] handle that must be passed to [`WorkerPool::wait`] before the
//! next dispatch.

mod shard;
mod worker;

pub use shard::partition;

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, trace};

use crate::domain::{EngineError, Force};
use crate::systems::forces::{ForceParams, ParticleField};

use worker::{Command, Completion, Job};

/// How often `wait` checks for dead workers while blocked
const LIVENESS_POLL: Duration = Duration::from_millis(250);

struct WorkerHandle {
    commands: Sender<Command>,
    thread: Option<JoinHandle<()>>,
}

/// Proof of an in-flight dispatch; consume it with [`WorkerPool::wait`]
#[must_use = "a dispatch must be waited on before the next one"]
#[derive(Debug)]
pub struct Dispatch {
    generation: u64,
    active: usize,
}

impl Dispatch {
    /// Number of workers given a shard
    pub fn active_workers(&self) -> usize {
        self.active
    }
}

pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    done: Receiver<Completion>,
    /// Private accumulators, parked here while their worker is idle
    buffers: Vec<Vec<Force>>,
    generation: u64,
    in_flight: Option<u64>,
    /// Workers that took part in the last completed dispatch
    last_active: usize,
}

impl WorkerPool {
    /// Start `workers` threads (at least one)
    pub fn new(workers: usize) -> Result<Self, EngineError> {
        let count = workers.max(1);
        let (done_tx, done_rx) = unbounded();

        let mut handles = Vec::with_capacity(count);
        for id in 0..count {
            let (tx, rx) = unbounded();
            let done = done_tx.clone();
            let thread = thread::Builder::new()
                .name(format!("force-worker-{id}"))
                .spawn(move || worker::run(id, rx, done))?;
            handles.push(WorkerHandle { commands: tx, thread: Some(thread) });
        }
        debug!(workers = count, "force pool started");

        Ok(Self {
            workers: handles,
            done: done_rx,
            buffers: vec![Vec::new(); count],
            generation: 0,
            in_flight: None,
            last_active: 0,
        })
    }

    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fan `keys` out to the workers.
    ///
    /// `field` must not be mutated until the matching `wait` returns; the
    /// workers hold clones of the `Arc` until then.
    pub fn dispatch(
        &mut self,
        keys: Arc<[usize]>,
        field: &Arc<ParticleField>,
        params: ForceParams,
    ) -> Dispatch {
        assert!(
            self.in_flight.is_none(),
            "dispatch while generation {:?} is still in flight",
            self.in_flight
        );
        self.generation += 1;
        let generation = self.generation;

        let shards = partition(keys.len(), self.workers.len());
        trace!(generation, keys = keys.len(), shards = shards.len(), "force dispatch");

        for (id, range) in shards.iter().cloned().enumerate() {
            let job = Job {
                generation,
                keys: Arc::clone(&keys),
                range,
                field: Arc::clone(field),
                params,
                forces: std::mem::take(&mut self.buffers[id]),
            };
            if self.workers[id].commands.send(Command::Run(job)).is_err() {
                panic!("force worker {id} is gone");
            }
        }

        self.in_flight = Some(generation);
        Dispatch { generation, active: shards.len() }
    }

    /// Block until every shard of `dispatch` has reported back
    pub fn wait(&mut self, dispatch: Dispatch) {
        assert_eq!(self.in_flight, Some(dispatch.generation), "wait on a stale dispatch");

        let mut pending = dispatch.active;
        while pending > 0 {
            match self.done.recv_timeout(LIVENESS_POLL) {
                Ok(Completion { worker, generation, forces }) => {
                    assert_eq!(generation, dispatch.generation, "completion from another dispatch");
                    self.buffers[worker] = forces;
                    pending -= 1;
                }
                Err(RecvTimeoutError::Timeout) => self.check_alive(),
                Err(RecvTimeoutError::Disconnected) => panic!("all force workers are gone"),
            }
        }

        self.in_flight = None;
        self.last_active = dispatch.active;
    }

    /// Add the private accumulators of the last dispatch into `global`.
    ///
    /// Only buffers that took part in that dispatch are summed; idle
    /// workers may still hold results from an older, larger dispatch.
    pub fn reduce(&self, global: &mut [Force]) {
        assert!(self.in_flight.is_none(), "reduce before wait");
        for buffer in &self.buffers[..self.last_active] {
            debug_assert_eq!(buffer.len(), global.len());
            for (g, f) in global.iter_mut().zip(buffer.iter()) {
                *g += *f;
            }
        }
    }

    /// dispatch + wait + reduce
    pub fn run(
        &mut self,
        keys: Arc<[usize]>,
        field: &Arc<ParticleField>,
        params: ForceParams,
        global: &mut [Force],
    ) -> usize {
        let dispatch = self.dispatch(keys, field, params);
        let active = dispatch.active_workers();
        self.wait(dispatch);
        self.reduce(global);
        active
    }

    fn check_alive(&self) {
        for (id, w) in self.workers.iter().enumerate() {
            if w.thread.as_ref().map_or(true, |t| t.is_finished()) {
                panic!("force worker {id} died during a dispatch");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for w in &self.workers {
            let _ = w.commands.send(Command::Shutdown);
        }
        for (id, w) in self.workers.iter_mut().enumerate() {
            if let Some(thread) = w.thread.take() {
                if thread.join().is_err() {
                    debug!(worker = id, "force worker panicked");
                }
            }
        }
        debug!(workers = self.workers.len(), "force pool shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::range_f32;
    use crate::domain::Particle;
    use crate::spatial::{DensityField, SpatialGrid};
    use crate::systems::forces::accumulate_all;

    fn field(count: usize, seed: u32) -> Arc<ParticleField> {
        let mut rng = seed;
        let particles = (0..count)
            .map(|i| {
                let x = range_f32(&mut rng, 0.0, 400.0);
                let y = range_f32(&mut rng, 0.0, 300.0);
                Particle::new(x, y, i % 5 == 0, i as u32)
            })
            .collect();
        let mut field = ParticleField::new(
            particles,
            SpatialGrid::new(400.0, 300.0, 40.0),
            DensityField::new(400.0, 300.0, 8),
        );
        field.rebuild(&mut Vec::new());
        Arc::new(field)
    }

    fn serial(field: &ParticleField, params: &ForceParams) -> Vec<Force> {
        let mut out = vec![Force::ZERO; field.particles.len()];
        accumulate_all(field.view(), params, &mut out);
        out
    }

    fn assert_close(a: &[Force], b: &[Force]) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert!((*x - *y).length() < 1e-4, "particle {i}: {x:?} vs {y:?}");
        }
    }

    #[test]
    fn pool_matches_serial_for_every_worker_count() {
        let field = field(600, 99);
        let params = ForceParams::default();
        let expected = serial(&field, &params);
        let keys: Arc<[usize]> = field.grid.active_cells().into();

        for workers in 1..=6 {
            let mut pool = WorkerPool::new(workers).expect("spawn");
            let mut global = vec![Force::ZERO; field.particles.len()];
            pool.run(Arc::clone(&keys), &field, params, &mut global);
            assert_close(&global, &expected);
        }
    }

    #[test]
    fn smaller_dispatch_ignores_stale_buffers() {
        let field = field(400, 5);
        let params = ForceParams::default();
        let mut pool = WorkerPool::new(4).expect("spawn");

        let all: Arc<[usize]> = field.grid.active_cells().into();
        let mut global = vec![Force::ZERO; field.particles.len()];
        assert_eq!(pool.run(all, &field, params, &mut global), 4);

        let one: Arc<[usize]> = field.grid.active_cells()[..1].into();
        let mut global = vec![Force::ZERO; field.particles.len()];
        assert_eq!(pool.run(Arc::clone(&one), &field, params, &mut global), 1);

        let mut expected = vec![Force::ZERO; field.particles.len()];
        crate::systems::forces::accumulate_cell_forces(&one, field.view(), &params, &mut expected);
        assert_close(&global, &expected);
    }

    #[test]
    fn empty_dispatch_completes_immediately() {
        let field = field(10, 1);
        let mut pool = WorkerPool::new(3).expect("spawn");
        let mut global = vec![Force::ZERO; 10];
        assert_eq!(pool.run(Arc::from(Vec::new()), &field, ForceParams::default(), &mut global), 0);
        assert!(global.iter().all(|f| *f == Force::ZERO));
    }

    #[test]
    fn field_is_exclusive_again_after_wait() {
        let mut field = field(200, 3);
        let mut pool = WorkerPool::new(2).expect("spawn");
        let keys: Arc<[usize]> = field.grid.active_cells().into();
        let dispatch = pool.dispatch(keys, &field, ForceParams::default());
        pool.wait(dispatch);
        assert!(Arc::get_mut(&mut field).is_some());
    }

    #[test]
    #[should_panic(expected = "still in flight")]
    fn second_dispatch_before_wait_panics() {
        let field = field(50, 2);
        let mut pool = WorkerPool::new(2).expect("spawn");
        let keys: Arc<[usize]> = field.grid.active_cells().into();
        let _first = pool.dispatch(Arc::clone(&keys), &field, ForceParams::default());
        let _second = pool.dispatch(keys, &field, ForceParams::default());
    }

    #[test]
    fn zero_workers_means_one() {
        let pool = WorkerPool::new(0).expect("spawn");
        assert_eq!(pool.worker_count(), 1);
    }
}
