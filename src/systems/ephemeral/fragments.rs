//! Fragments - short-lived sparks, embers and rainbow shards
//!
//! Purely kinematic: damped velocity, Euler position, removed once their
//! age passes their lifespan. Stored in an unordered set with O(1)
//! swap-remove; fragments carry no identity, so indices are meaningless
//! across frames.

use tracing::debug;

use crate::core::random::{below, range_f32, unit_f32};

/// Age added per frame (seconds at the nominal 60 Hz tick)
pub const FRAGMENT_AGE_STEP: f32 = 0.016;
pub const FRAGMENT_VELOCITY_DAMP: f32 = 0.98;
/// Fragments smaller than this are dropped
pub const FRAGMENT_MIN_SIZE: f32 = 1.5;

const GOLDEN_RATIO: f32 = 1.618_034;
const EXPLOSION_FRAGMENTS: usize = 60;
const RAINBOW_BASE_COUNT: f32 = 60.0;
const RAINBOW_MIN_COUNT: usize = 10;
const SPIRAL_STRENGTH: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FragmentKind {
    /// Hue-cycling spiral shard
    Rainbow = 0,
    /// Burning explosion debris (hot)
    Ember = 1,
    /// Glowing heat blob (hot)
    Heat = 2,
    /// Player trail spark
    Trail = 3,
    /// Explosion smoke puff
    Smoke = 4,
    /// Spark shed by an explosive blob
    Spark = 5,
}

impl FragmentKind {
    /// Kinds that deposit heat into nearby water
    #[inline]
    pub fn carries_heat(self) -> bool {
        matches!(self, FragmentKind::Ember | FragmentKind::Heat)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub age: f32,
    pub life: f32,
    pub size: f32,
    pub kind: FragmentKind,
    /// Spawn angle, used by renderers for spiral orientation
    pub angle: f32,
    /// Base hue in [0, 1) for rainbow shards
    pub hue: f32,
    /// Opacity at birth
    pub alpha0: f32,
}

impl Fragment {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, life: f32, size: f32, kind: FragmentKind) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            age: 0.0,
            life,
            size,
            kind,
            angle: 0.0,
            hue: 0.0,
            alpha0: 1.0,
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age > self.life || self.size < FRAGMENT_MIN_SIZE
    }

    /// Fraction of lifespan consumed, 0..1
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.life <= 0.0 {
            return 1.0;
        }
        (self.age / self.life).min(1.0)
    }
}

/// Capped, unordered fragment container
pub struct FragmentSet {
    items: Vec<Fragment>,
    cap: usize,
}

impl FragmentSet {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::with_capacity(cap.min(4096)),
            cap,
        }
    }

    #[inline]
    pub fn len(&self) -> usize { self.items.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    #[inline]
    pub fn cap(&self) -> usize { self.cap }

    pub fn as_slice(&self) -> &[Fragment] { &self.items }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Add one fragment; dropped silently once the cap is reached
    pub fn push(&mut self, fragment: Fragment) -> bool {
        if self.items.len() >= self.cap {
            return false;
        }
        self.items.push(fragment);
        true
    }

    /// Advance every fragment one frame and swap-remove the expired ones.
    ///
    /// Iterates to the live count rather than with an iterator: a removed
    /// slot is refilled by the last element and re-examined.
    pub fn update(&mut self) {
        let mut i = 0;
        while i < self.items.len() {
            let f = &mut self.items[i];
            f.age += FRAGMENT_AGE_STEP;
            f.vx *= FRAGMENT_VELOCITY_DAMP;
            f.vy *= FRAGMENT_VELOCITY_DAMP;
            f.x += f.vx;
            f.y += f.vy;

            if f.is_expired() {
                self.items.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Radial burst of embers and smoke (every 4th fragment is an ember)
    pub fn spawn_explosion(&mut self, x: f32, y: f32, rng: &mut u32) -> usize {
        let mut spawned = 0;
        for i in 0..EXPLOSION_FRAGMENTS {
            if self.items.len() >= self.cap {
                debug!(spawned, cap = self.cap, "explosion truncated at fragment cap");
                break;
            }
            let angle = below(rng, 628) as f32 / 100.0;
            let speed = 3.0 + below(rng, 600) as f32 / 100.0;
            let kind = if i % 4 == 0 { FragmentKind::Ember } else { FragmentKind::Smoke };
            let mut f = Fragment::new(
                x,
                y,
                angle.cos() * speed,
                angle.sin() * speed,
                0.8 + below(rng, 100) as f32 / 100.0,
                15.0 + below(rng, 40) as f32,
                kind,
            );
            f.angle = angle;
            self.items.push(f);
            spawned += 1;
        }
        spawned
    }

    /// Golden-angle spiral of rainbow shards.
    ///
    /// Count is `max(10, 60 * intensity)`. When the burst would overflow
    /// the cap the oldest fragments (front of the set) are evicted first;
    /// whatever still does not fit is dropped.
    pub fn spawn_rainbow(&mut self, x: f32, y: f32, t: f32, intensity: f32, rng: &mut u32) -> usize {
        let count = ((RAINBOW_BASE_COUNT * intensity) as usize).max(RAINBOW_MIN_COUNT);

        let overflow = (self.items.len() + count).saturating_sub(self.cap);
        if overflow > 0 {
            let evict = overflow.min(self.items.len());
            self.items.drain(..evict);
        }

        let tau = std::f32::consts::TAU;
        let mut spawned = 0;
        for i in 0..count {
            if self.items.len() >= self.cap {
                break;
            }
            let angle = (i as f32 / count as f32) * tau * GOLDEN_RATIO;
            let dist_from_center = 1.0 + unit_f32(rng) * 20.0;
            let speed = 1.5 + unit_f32(rng) * 2.5;

            let radial_x = angle.cos() * speed;
            let radial_y = angle.sin() * speed;
            let tangent_x = -angle.sin() * speed * SPIRAL_STRENGTH;
            let tangent_y = angle.cos() * speed * SPIRAL_STRENGTH;

            let mut f = Fragment::new(
                x + radial_x * dist_from_center * 0.1,
                y + radial_y * dist_from_center * 0.1,
                radial_x + tangent_x,
                radial_y + tangent_y,
                range_f32(rng, 1.0, 2.5),
                range_f32(rng, 5.0, 20.0),
                FragmentKind::Rainbow,
            );
            f.angle = angle;
            f.hue = (angle / tau + t * 0.1).rem_euclid(1.0);
            f.alpha0 = range_f32(rng, 0.6, 1.0);
            self.items.push(f);
            spawned += 1;
        }
        spawned
    }

    /// One upward spark from an explosive blob
    pub fn spawn_spark(&mut self, x: f32, y: f32, rng: &mut u32) -> bool {
        let jitter_x = below(rng, 10) as f32 - 5.0;
        let jitter_y = below(rng, 10) as f32 - 5.0;
        let vx = (below(rng, 10) as f32 - 5.0) * 0.3;
        let vy = -1.0 - below(rng, 10) as f32 * 0.2;
        let mut f = Fragment::new(x + jitter_x, y + jitter_y, vx, vy, 0.5, 4.0, FragmentKind::Spark);
        f.alpha0 = 0.8;
        self.push(f)
    }
}
