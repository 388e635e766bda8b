//! Starfall Engine - real-time 2D particle simulation core
//!
//! A player-controlled cluster pushes through a pool of water particles.
//! Painted blobs, explosives and meteor drops come and go around them.
//!
//! Architecture:
//! - core/       - vector math, RNG, safety macros
//! - domain/     - particles, player state, configuration, errors
//! - spatial/    - spatial grid, density field, brush buckets
//! - systems/    - force model, worker pool, integrator, ephemeral objects
//! - simulation/ - the frame driver
//!
//! Rendering, audio synthesis and window/input handling live outside this
//! crate; they read the simulation state and drain its sound queue.

// Utils with safety macros (must be first for macro export!)
#[macro_use]
pub mod core;
pub mod domain;
pub mod spatial;
pub mod systems;
pub mod simulation;

pub use crate::core::Vec2;
pub use domain::{ConfigError, EngineError, Particle, PlayerState, SimConfig};
pub use simulation::{FrameInput, FrameStats, Simulation};
pub use systems::ephemeral::{BrushKind, BrushParticle, Fragment, FragmentKind};
pub use systems::{SoundKind, SoundQueue};

/// Engine version
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
