//! Brush Particles - painted blobs, explosives and meteor drops
//!
//! State machine per particle:
//!   active -> absorbed / dissolving (countdown 1..=8) -> removed
//!
//! While active each kind runs its own motion (spring for paint, jitter for
//! explosives, gravity for drops). The dissolve countdown grows by one every
//! frame once started; the first dissolve frame fires a one-shot effect.

use tracing::debug;

use crate::core::random::{below, one_in};
use crate::domain::{Particle, PlayerState};
use crate::spatial::DensityField;
use crate::systems::audio::{SoundKind, SoundQueue};

use super::FragmentSet;

pub const SPRING_STIFFNESS: f32 = 0.08;
pub const BRUSH_VELOCITY_DAMP: f32 = 0.82;
/// Age added per frame
pub const BRUSH_AGE_STEP: f32 = 0.12;
pub const IMPACT_DECAY: f32 = 0.85;
/// Impact above which a frame counts toward dissolving a paint blob
pub const HIGH_IMPACT: f32 = 15.0;
/// Consecutive high-impact frames tolerated before a paint blob dissolves
pub const HIGH_IMPACT_FRAMES: u32 = 8;
/// Countdown value past which a dissolving particle is removed
pub const DISSOLVE_FRAMES: u32 = 8;

pub const DROP_GRAVITY: f32 = 0.15;
/// Density that counts as "water" for a falling drop
const DROP_HIT_DENSITY: f32 = 0.5;
/// Probe distance below a drop for the density lookup
const DROP_PROBE_OFFSET: f32 = 20.0;
const DROP_BLOB_SIZE: f32 = 100.0;
const DROP_BLOB_DISSOLVE: u32 = 4;

/// Explosives only arm after this age
const EXPLOSIVE_ARM_AGE: f32 = 2.0;
/// Detonation reach as a fraction of blob size
const EXPLOSIVE_REACH: f32 = 0.8;

/// Intensity of the rainbow burst when a rainbow blob starts dissolving
const RAINBOW_DISSOLVE_INTENSITY: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BrushKind {
    /// Blue paint blob, springs back to where it was painted
    Paint = 1,
    /// Absorbed by the player for a timed rainbow state
    Rainbow = 2,
    /// Detonates against the player cluster
    Explosive = 3,
    /// Falling meteor drop
    Drop = 4,
}

impl BrushKind {
    /// Kind painted for a brush effect mode (2 = rainbow, 3 = explosive,
    /// anything else = paint)
    pub fn from_effect(mode: u8) -> Self {
        match mode {
            2 => BrushKind::Rainbow,
            3 => BrushKind::Explosive,
            _ => BrushKind::Paint,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushParticle {
    pub x: f32,
    pub y: f32,
    /// Rest position for paint blobs
    pub base_x: f32,
    pub base_y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub age: f32,
    /// Visual wobble phase
    pub phase: f32,
    pub impact: f32,
    pub high_impact_frames: u32,
    /// 0 while active, then counts frames of the dissolve
    pub dissolve_frame: u32,
    pub kind: BrushKind,
    pub absorbed: bool,
    /// A water particle touched the surface this run
    pub has_water: bool,
}

impl BrushParticle {
    pub fn new(x: f32, y: f32, size: f32, kind: BrushKind) -> Self {
        Self {
            x,
            y,
            base_x: x,
            base_y: y,
            vx: 0.0,
            vy: 0.0,
            size,
            age: 0.0,
            phase: 0.0,
            impact: 0.0,
            high_impact_frames: 0,
            dissolve_frame: 0,
            kind,
            absorbed: false,
            has_water: false,
        }
    }

    #[inline]
    pub fn is_dissolving(&self) -> bool {
        self.dissolve_frame > 0
    }

    /// Mark absorbed and start the dissolve countdown
    #[inline]
    pub fn absorb(&mut self) {
        self.absorbed = true;
        self.dissolve_frame = 1;
    }
}

/// Everything a brush update reads or writes outside the brush set
pub struct BrushEnv<'a> {
    pub brush_mode: bool,
    pub world_height: f32,
    pub particles: &'a [Particle],
    pub density: &'a DensityField,
    pub fragments: &'a mut FragmentSet,
    pub sounds: &'a SoundQueue,
    pub player: &'a mut PlayerState,
    pub rng: &'a mut u32,
}

/// Capped, unordered brush particle container
pub struct BrushSet {
    items: Vec<BrushParticle>,
    cap: usize,
    spawned: Vec<BrushParticle>,
}

impl BrushSet {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
            spawned: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize { self.items.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    #[inline]
    pub fn cap(&self) -> usize { self.cap }

    pub fn as_slice(&self) -> &[BrushParticle] { &self.items }

    pub fn as_mut_slice(&mut self) -> &mut [BrushParticle] { &mut self.items }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Add one particle; dropped once the cap is reached
    pub fn push(&mut self, particle: BrushParticle) -> bool {
        if self.items.len() >= self.cap {
            return false;
        }
        self.items.push(particle);
        true
    }

    /// Advance every brush particle one frame.
    ///
    /// Removal is swap-with-last, so the loop runs to the live count and
    /// re-examines the slot it just refilled. Explosive blobs born from
    /// drop impacts are appended after the pass and first move next frame.
    pub fn update(&mut self, env: &mut BrushEnv<'_>) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.items.len() {
            let b = &mut self.items[i];
            match b.kind {
                BrushKind::Drop => {
                    if !b.absorbed {
                        step_drop(b, env, &mut self.spawned);
                    }
                }
                BrushKind::Explosive => {
                    if !b.absorbed {
                        step_explosive(b, env);
                    }
                }
                BrushKind::Paint | BrushKind::Rainbow => step_spring(b),
            }

            b.age += BRUSH_AGE_STEP;
            b.impact *= IMPACT_DECAY;

            if b.is_dissolving() {
                // absorption already played its own effect
                if b.dissolve_frame == 1 && !b.absorbed {
                    dissolve_effect(b, env);
                }
                b.dissolve_frame += 1;
            } else if b.kind == BrushKind::Paint {
                if b.impact > HIGH_IMPACT {
                    b.high_impact_frames += 1;
                } else {
                    b.high_impact_frames = 0;
                }
                if b.high_impact_frames > HIGH_IMPACT_FRAMES {
                    b.dissolve_frame = 1;
                }
            }

            if b.dissolve_frame > DISSOLVE_FRAMES {
                self.items.swap_remove(i);
                removed += 1;
            } else {
                i += 1;
            }
        }

        for blob in self.spawned.drain(..) {
            if self.items.len() >= self.cap {
                debug!(cap = self.cap, "brush cap reached, impact blob dropped");
                break;
            }
            self.items.push(blob);
        }
        removed
    }
}

fn step_spring(b: &mut BrushParticle) {
    b.vx += (b.base_x - b.x) * SPRING_STIFFNESS;
    b.vy += (b.base_y - b.y) * SPRING_STIFFNESS;
    b.x += b.vx;
    b.y += b.vy;
    b.vx *= BRUSH_VELOCITY_DAMP;
    b.vy *= BRUSH_VELOCITY_DAMP;
}

fn step_drop(b: &mut BrushParticle, env: &mut BrushEnv<'_>, spawned: &mut Vec<BrushParticle>) {
    b.vy += DROP_GRAVITY;
    b.x += b.vx;
    b.y += b.vy;

    let in_water = b.y > env.world_height * 0.1
        && env.density.sample(b.x, b.y + DROP_PROBE_OFFSET) > DROP_HIT_DENSITY;
    let on_floor = b.y > env.world_height - 10.0;
    if !(in_water || on_floor) {
        return;
    }

    b.absorb();
    if one_in(env.rng, 20) {
        env.sounds.enqueue(SoundKind::Explosion);
    }

    let mut blob = BrushParticle::new(b.x, b.y, DROP_BLOB_SIZE, BrushKind::Explosive);
    blob.dissolve_frame = DROP_BLOB_DISSOLVE;
    spawned.push(blob);

    if one_in(env.rng, 3) {
        env.fragments.spawn_explosion(b.x, b.y, env.rng);
    }
    if one_in(env.rng, 5) {
        env.fragments.spawn_rainbow(b.x, b.y, 0.0, 0.8, env.rng);
    }
}

fn step_explosive(b: &mut BrushParticle, env: &mut BrushEnv<'_>) {
    b.x += (below(env.rng, 10) as f32 - 5.0) * 0.2;
    b.y += (below(env.rng, 10) as f32 - 5.0) * 0.2;

    if one_in(env.rng, 4) {
        env.fragments.spawn_spark(b.x, b.y, env.rng);
    }

    if env.brush_mode || b.age <= EXPLOSIVE_ARM_AGE {
        return;
    }
    let reach = b.size * EXPLOSIVE_REACH;
    let reach_sq = reach * reach;
    let touched = env
        .particles
        .iter()
        .any(|p| p.is_player && p.dist_sq_to(b.x, b.y) < reach_sq);
    if touched {
        b.absorb();
        env.sounds.enqueue(SoundKind::Explosion);
        env.player.start_sun();
        env.fragments.spawn_explosion(b.x, b.y, env.rng);
        debug!(x = b.x, y = b.y, "explosive detonated");
    }
}

fn dissolve_effect(b: &BrushParticle, env: &mut BrushEnv<'_>) {
    match b.kind {
        BrushKind::Rainbow => {
            env.fragments
                .spawn_rainbow(b.x, b.y, b.age, RAINBOW_DISSOLVE_INTENSITY, env.rng);
            env.sounds.enqueue(SoundKind::Rainbow);
        }
        BrushKind::Paint => {
            env.sounds.enqueue(SoundKind::Paint);
        }
        BrushKind::Explosive | BrushKind::Drop => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        particles: Vec<Particle>,
        density: DensityField,
        fragments: FragmentSet,
        sounds: SoundQueue,
        player: PlayerState,
        rng: u32,
    }

    impl Harness {
        fn new(particles: Vec<Particle>) -> Self {
            let mut density = DensityField::new(400.0, 400.0, 8);
            density.rebuild(&particles);
            Self {
                particles,
                density,
                fragments: FragmentSet::new(1000),
                sounds: SoundQueue::new(100),
                player: PlayerState::default(),
                rng: 12345,
            }
        }

        fn step(&mut self, set: &mut BrushSet, brush_mode: bool) -> usize {
            let mut env = BrushEnv {
                brush_mode,
                world_height: 400.0,
                particles: &self.particles,
                density: &self.density,
                fragments: &mut self.fragments,
                sounds: &self.sounds,
                player: &mut self.player,
                rng: &mut self.rng,
            };
            set.update(&mut env)
        }
    }

    #[test]
    fn paint_springs_back_to_rest() {
        let mut h = Harness::new(Vec::new());
        let mut set = BrushSet::new(10);
        let mut blob = BrushParticle::new(100.0, 100.0, 60.0, BrushKind::Paint);
        blob.x = 130.0;
        set.push(blob);
        for _ in 0..200 {
            h.step(&mut set, false);
        }
        let b = set.as_slice()[0];
        assert!((b.x - 100.0).abs() < 0.5);
        assert!(!b.is_dissolving());
    }

    #[test]
    fn sustained_impact_dissolves_paint_and_removes_it() {
        let mut h = Harness::new(Vec::new());
        let mut set = BrushSet::new(10);
        set.push(BrushParticle::new(100.0, 100.0, 60.0, BrushKind::Paint));

        for frame in 0..HIGH_IMPACT_FRAMES + 1 {
            set.as_mut_slice()[0].impact = 100.0;
            h.step(&mut set, false);
            let b = set.as_slice()[0];
            assert_eq!(b.is_dissolving(), frame == HIGH_IMPACT_FRAMES);
        }
        assert!(h.sounds.is_empty());

        // first dissolve frame requests the paint sound
        h.step(&mut set, false);
        assert_eq!(h.sounds.drain(), vec![SoundKind::Paint]);

        let mut frames = 1;
        while !set.is_empty() {
            h.step(&mut set, false);
            frames += 1;
            assert!(frames <= DISSOLVE_FRAMES);
        }
        assert_eq!(frames, DISSOLVE_FRAMES);
    }

    #[test]
    fn drop_hitting_floor_becomes_short_lived_explosive() {
        let mut h = Harness::new(Vec::new());
        let mut set = BrushSet::new(10);
        let mut drop = BrushParticle::new(200.0, 389.0, 100.0, BrushKind::Drop);
        drop.vy = 2.0;
        set.push(drop);
        h.step(&mut set, false);

        assert_eq!(set.len(), 2);
        let blob = set.as_slice().iter().find(|b| b.kind == BrushKind::Explosive).unwrap();
        assert_eq!(blob.dissolve_frame, DROP_BLOB_DISSOLVE);
        assert!(set.as_slice().iter().any(|b| b.kind == BrushKind::Drop && b.absorbed));

        for _ in 0..20 {
            h.step(&mut set, false);
        }
        assert!(set.is_empty());
    }

    #[test]
    fn drop_lands_on_dense_water() {
        let water: Vec<Particle> = (0..20).map(|i| Particle::water(200.0, 120.0 + (i % 3) as f32, i)).collect();
        let mut h = Harness::new(water);
        let mut set = BrushSet::new(10);
        set.push(BrushParticle::new(200.0, 100.0, 100.0, BrushKind::Drop));
        h.step(&mut set, false);
        assert!(set.as_slice().iter().any(|b| b.kind == BrushKind::Drop && b.absorbed));
    }

    #[test]
    fn explosive_detonates_on_armed_player_contact() {
        let mut h = Harness::new(vec![Particle::player(100.0, 100.0, 0)]);
        let mut set = BrushSet::new(10);
        set.push(BrushParticle::new(100.0, 100.0, 60.0, BrushKind::Explosive));

        // not armed yet: age must pass 2.0 (about 17 frames)
        for _ in 0..16 {
            h.step(&mut set, false);
        }
        assert!(!set.as_slice()[0].absorbed);
        assert!(!h.player.sun_mode);

        for _ in 0..2 {
            h.step(&mut set, false);
        }
        assert!(set.as_slice()[0].absorbed);
        assert!(h.player.sun_mode);
        assert!(h.sounds.drain().contains(&SoundKind::Explosion));
        assert!(h.fragments.len() >= 60);
    }

    #[test]
    fn brush_mode_keeps_explosives_safe() {
        let mut h = Harness::new(vec![Particle::player(100.0, 100.0, 0)]);
        let mut set = BrushSet::new(10);
        set.push(BrushParticle::new(100.0, 100.0, 60.0, BrushKind::Explosive));
        for _ in 0..40 {
            h.step(&mut set, true);
        }
        assert!(!set.as_slice()[0].absorbed);
    }

    #[test]
    fn absorbed_rainbow_dissolves_silently() {
        let mut h = Harness::new(Vec::new());
        let mut set = BrushSet::new(10);
        let mut blob = BrushParticle::new(50.0, 50.0, 60.0, BrushKind::Rainbow);
        blob.absorb();
        set.push(blob);
        for _ in 0..DISSOLVE_FRAMES {
            h.step(&mut set, false);
        }
        assert!(set.is_empty());
        assert!(h.fragments.is_empty());
        assert!(h.sounds.is_empty());
    }

    #[test]
    fn rainbow_dissolve_bursts_once() {
        let mut h = Harness::new(Vec::new());
        let mut set = BrushSet::new(10);
        let mut blob = BrushParticle::new(50.0, 50.0, 60.0, BrushKind::Rainbow);
        blob.dissolve_frame = 1;
        set.push(blob);
        h.step(&mut set, false);
        let burst = h.fragments.len();
        assert_eq!(burst, 60);
        h.step(&mut set, false);
        assert!(h.fragments.len() <= burst);
        assert_eq!(h.sounds.drain(), vec![SoundKind::Rainbow]);
    }

    #[test]
    fn effect_modes_map_to_kinds() {
        assert_eq!(BrushKind::from_effect(1), BrushKind::Paint);
        assert_eq!(BrushKind::from_effect(2), BrushKind::Rainbow);
        assert_eq!(BrushKind::from_effect(3), BrushKind::Explosive);
        assert_eq!(BrushKind::from_effect(9), BrushKind::Paint);
    }
}
