//! Sound Requests - bounded hand-off to the audio collaborator
//!
//! The simulation only enqueues; an audio thread drains once per output
//! buffer. Past the backlog cap requests are dropped, which bounds how long
//! either side can hold the lock.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKind {
    /// Paint blob pushed hard or dissolving
    Paint,
    Rainbow,
    Explosion,
}

pub struct SoundQueue {
    pending: Mutex<Vec<SoundKind>>,
    capacity: usize,
}

impl SoundQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Shared handle for handing to the audio thread
    pub fn shared(capacity: usize) -> Arc<Self> {
        Arc::new(Self::new(capacity))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Non-blocking apart from the short lock; `false` if the request was dropped
    pub fn enqueue(&self, kind: SoundKind) -> bool {
        let mut pending = self.pending.lock();
        if pending.len() >= self.capacity {
            debug!(?kind, backlog = pending.len(), "sound request dropped");
            return false;
        }
        pending.push(kind);
        true
    }

    /// Take every pending request, oldest first
    pub fn drain(&self) -> Vec<SoundKind> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}
