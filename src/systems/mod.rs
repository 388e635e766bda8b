//! Systems - per-frame stages of the simulation
//!
//! - forces     - pairwise repulsion, density, cohesion, mouse and heat terms
//! - pool       - worker threads that run the pairwise pass
//! - integrator - temperature, gravity, damping and wall reflection
//! - ephemeral  - brush particles, fragments, collisions, painting, meteors
//! - audio      - bounded sound request queue

pub mod audio;
pub mod ephemeral;
pub mod forces;
pub mod integrator;
pub mod pool;

pub use audio::{SoundKind, SoundQueue};
pub use forces::{ForceParams, ForceView, ParticleField};
pub use integrator::{integrate, IntegrateParams};
pub use pool::{Dispatch, WorkerPool};
