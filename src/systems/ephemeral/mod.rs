//! Ephemeral Objects - everything created and destroyed during play
//!
//! - fragments  - sparks, embers, smoke and rainbow shards
//! - brush      - painted blobs, explosives and meteor drops
//! - collisions - brush vs particle contact
//! - painting   - Hermite brush strokes
//! - meteors    - periodic meteor showers
//!
//! Both containers are unordered and capped; spawns past the cap are
//! truncated.

mod brush;
mod collisions;
mod fragments;
mod meteors;
mod painting;

pub use brush::{BrushEnv, BrushKind, BrushParticle, BrushSet, DISSOLVE_FRAMES, HIGH_IMPACT, HIGH_IMPACT_FRAMES};
pub use collisions::{resolve_brush_collisions, CollisionEnv, SoundThrottle, PAINT_SOUND_INTERVAL};
pub use fragments::{Fragment, FragmentKind, FragmentSet, FRAGMENT_AGE_STEP, FRAGMENT_MIN_SIZE};
pub use meteors::{spawn_meteor_drop, MeteorSpawner, METEOR_PARTICLES};
pub use painting::{hermite, paint_blob, BrushStroke};
