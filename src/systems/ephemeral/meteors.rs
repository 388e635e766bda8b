//! Meteor spawner - periodic showers of falling drops
//!
//! A meteor is a gaussian cloud of drop particles that falls until it
//! hits water or the floor (see the brush update).

use std::f32::consts::TAU;

use tracing::trace;

use crate::core::random::{below, unit_f32};

use super::{BrushKind, BrushParticle, BrushSet};

pub const METEOR_PARTICLES: usize = 100;
pub const METEOR_SPREAD: f32 = 60.0;
const METEOR_DROP_SIZE: f32 = 100.0;
/// Meteors spawn this far from either side wall
const METEOR_MARGIN: u32 = 100;

/// Spawn one meteor cloud centred on (x, y); returns drops added
pub fn spawn_meteor_drop(x: f32, y: f32, brushes: &mut BrushSet, rng: &mut u32) -> usize {
    let fall_speed = 2.0 + below(rng, 10) as f32;
    let mut added = 0;
    for _ in 0..METEOR_PARTICLES {
        if brushes.len() >= brushes.cap() {
            break;
        }
        // Box-Muller radius; r1 is kept off zero so ln stays finite
        let r1 = unit_f32(rng).max(1e-6);
        let r2 = unit_f32(rng);
        let radius = (-2.0 * r1.ln()).sqrt();
        let offset_x = radius * (TAU * r2).cos() * METEOR_SPREAD;
        let offset_y = radius * (TAU * r2).sin() * METEOR_SPREAD;

        let mut drop = BrushParticle::new(x + offset_x, y + offset_y, METEOR_DROP_SIZE, BrushKind::Drop);
        drop.vy = fall_speed;
        drop.phase = (offset_x * offset_x + offset_y * offset_y).sqrt();
        drop.impact = offset_y.atan2(offset_x);
        brushes.push(drop);
        added += 1;
    }
    added
}

#[derive(Clone, Copy, Debug)]
pub struct MeteorSpawner {
    timer: f32,
    interval: f32,
}

impl MeteorSpawner {
    /// First shower comes after 2..5 s
    pub fn new(rng: &mut u32) -> Self {
        Self {
            timer: 0.0,
            interval: 2.0 + below(rng, 300) as f32 / 100.0,
        }
    }

    pub fn timer(&self) -> f32 { self.timer }

    pub fn interval(&self) -> f32 { self.interval }

    /// Advance the clock by `dt` seconds; silent mode freezes it.
    ///
    /// A shower is 1 meteor (70%), 2 (20%) or 3 (10%). Returns meteors spawned.
    pub fn update(
        &mut self,
        silent: bool,
        dt: f32,
        width: f32,
        brushes: &mut BrushSet,
        rng: &mut u32,
    ) -> usize {
        if silent {
            return 0;
        }
        self.timer += dt;
        if self.timer <= self.interval {
            return 0;
        }

        let roll = below(rng, 100);
        let batch = match roll {
            r if r > 90 => 3,
            r if r > 70 => 2,
            _ => 1,
        };
        let span = (width as u32).saturating_sub(2 * METEOR_MARGIN).max(1);
        for _ in 0..batch {
            let x = METEOR_MARGIN as f32 + below(rng, span) as f32;
            let y = -50.0 - below(rng, 200) as f32;
            spawn_meteor_drop(x, y, brushes, rng);
        }

        self.timer = 0.0;
        self.interval = 0.5 + below(rng, 400) as f32 / 100.0;
        trace!(batch, next = self.interval, "meteor shower");
        batch
    }
}
