//! Particle - the one entity that lives for the whole run.
//!
//! Particles are created once at startup and never destroyed. The spatial
//! grid physically reorders the particle buffer every rebuild, so a slice
//! index is only valid until the next rebuild; `id` is the stable identity.

/// A single simulated particle (water or player cluster member)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Member of the player-controlled cluster
    pub is_player: bool,
    /// Heat, >= 0. Above the boiling point water jitters instead of falling.
    pub temperature: f32,
    /// Stable id in `0..count`, survives grid reordering
    pub id: u32,
}

impl Particle {
    pub fn new(x: f32, y: f32, is_player: bool, id: u32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            is_player,
            temperature: 0.0,
            id,
        }
    }

    pub fn water(x: f32, y: f32, id: u32) -> Self {
        Self::new(x, y, false, id)
    }

    pub fn player(x: f32, y: f32, id: u32) -> Self {
        Self::new(x, y, true, id)
    }

    #[inline]
    pub fn dist_sq_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Force accumulated for one particle during a frame
pub type Force = crate::core::Vec2;
