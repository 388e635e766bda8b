//! Domain types: particles, player state, configuration, errors.

pub mod config;
pub mod error;
pub mod particle;
pub mod player;

pub use config::SimConfig;
pub use error::{ConfigError, EngineError};
pub use particle::{Force, Particle};
pub use player::PlayerState;
