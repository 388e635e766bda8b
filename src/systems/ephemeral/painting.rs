//! Brush painting
//!
//! The stroke follows the player centre (the mouse while in brush mode).
//! Between two frames the path is a cubic Hermite curve using the previous
//! and current frame velocity as tangents, so fast strokes stay smooth.

use crate::core::random::below;
use crate::core::Vec2;

use super::{BrushKind, BrushParticle, BrushSet};

/// Spacing between painted blobs along the curve
pub const STROKE_STEP: f32 = 5.0;
/// Explosives are painted sparser
pub const STROKE_STEP_EXPLOSIVE: f32 = 20.0;
/// Movement below this is ignored
const MIN_STROKE: f32 = 1.0;

/// One freshly painted blob for the given brush effect mode
pub fn paint_blob(x: f32, y: f32, effect: u8, rng: &mut u32) -> BrushParticle {
    let kind = BrushKind::from_effect(effect);
    let mut size = 60.0 + below(rng, 30) as f32;
    if kind == BrushKind::Explosive {
        size *= 0.8;
    }
    let mut blob = BrushParticle::new(x, y, size, kind);
    blob.phase = below(rng, 628) as f32 / 100.0;
    blob
}

/// Cubic Hermite point between `p0` and `p1` with tangents `m0`, `m1`
#[inline]
pub fn hermite(p0: Vec2, p1: Vec2, m0: Vec2, m1: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h10 = t3 - 2.0 * t2 + t;
    let h11 = t3 - t2;
    p0 * h00 + p1 * h01 + m0 * h10 + m1 * h11
}

#[derive(Clone, Copy, Debug)]
pub struct BrushStroke {
    last: Vec2,
    last_velocity: Vec2,
}

impl BrushStroke {
    pub fn new(start: Vec2) -> Self {
        Self {
            last: start,
            last_velocity: Vec2::ZERO,
        }
    }

    pub fn last(&self) -> Vec2 {
        self.last
    }

    /// Paint along the path from the last centre to `center`.
    ///
    /// Not painting just tracks the centre and forgets the velocity, so the
    /// next stroke starts without a tangent. Returns blobs actually added.
    pub fn update(
        &mut self,
        painting: bool,
        effect: u8,
        center: Vec2,
        brushes: &mut BrushSet,
        rng: &mut u32,
    ) -> usize {
        if !painting {
            self.last = center;
            self.last_velocity = Vec2::ZERO;
            return 0;
        }

        let velocity = center - self.last;
        let dist = velocity.length();
        if !(dist > MIN_STROKE) {
            return 0;
        }

        let step = if BrushKind::from_effect(effect) == BrushKind::Explosive {
            STROKE_STEP_EXPLOSIVE
        } else {
            STROKE_STEP
        };
        let steps = (dist / step) as usize + 1;

        let mut added = 0;
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let at = hermite(self.last, center, self.last_velocity, velocity, t);
            if brushes.push(paint_blob(at.x, at.y, effect, rng)) {
                added += 1;
            }
        }

        self.last = center;
        self.last_velocity = velocity;
        added
    }
}
