//! Core building blocks shared by every system.
//!
//! - utils/safety - debug-checked / release-unchecked indexing macros
//! - vec2         - small 2D vector used for forces and impulses
//! - random       - xorshift32 generator (deterministic per seed)

#[macro_use]
pub mod utils {
    #[macro_use]
    pub mod safety;
}

pub mod random;
pub mod vec2;

pub use vec2::Vec2;
