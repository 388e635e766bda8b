//! Brush/particle collisions
//!
//! Brush particles are bucketed into the coarse [`BrushGrid`] each frame;
//! every simulation particle then checks the 3x3 buckets around it.
//!
//! - water vs paint:   pushed out to the blob surface, inward velocity removed
//! - player vs paint:  shoves the blob and builds up impact
//! - player vs rainbow: absorbs it (rainbow + jump state, fragments, sound)

use crate::core::Vec2;
use crate::domain::{Particle, PlayerState};
use crate::spatial::BrushGrid;
use crate::systems::audio::{SoundKind, SoundQueue};

use super::{BrushKind, BrushSet, FragmentSet};

/// Blob radius as a fraction of its size
const BRUSH_SURFACE_FACTOR: f32 = 0.55;
/// Water is held at this fraction of the blob radius
const SURFACE_RADIUS_FACTOR: f32 = 0.6;
const TANGENTIAL_FRICTION: f32 = 0.98;

/// Player reach on paint blobs as a fraction of blob size
const PLAYER_REACH: f32 = 0.85;
const PLAYER_PUSH: f32 = 1.2;
const PLAYER_FLOW: f32 = 0.8;
const PUSH_GAIN: f32 = 0.6;
const IMPACT_GAIN: f32 = 1.5;
/// Impact that makes a paint blob audible
const IMPACT_SOUND: f32 = 10.0;

/// Player reach on rainbow blobs as a fraction of blob size
const RAINBOW_REACH: f32 = 0.7;
const RAINBOW_ABSORB_INTENSITY: f32 = 0.4;

/// Frames between paint-impact sounds (80 ms at the 60 Hz tick)
pub const PAINT_SOUND_INTERVAL: u64 = 5;

/// Rate limiter for a sound that may be requested every frame
#[derive(Clone, Copy, Debug)]
pub struct SoundThrottle {
    interval: u64,
    last: Option<u64>,
}

impl SoundThrottle {
    pub fn new(interval: u64) -> Self {
        Self { interval, last: None }
    }

    /// `true` (and remember `frame`) if enough frames passed since the last hit
    pub fn ready(&mut self, frame: u64) -> bool {
        match self.last {
            Some(last) if frame.saturating_sub(last) < self.interval => false,
            _ => {
                self.last = Some(frame);
                true
            }
        }
    }
}

pub struct CollisionEnv<'a> {
    /// Mean player velocity, drives the "flow" part of the paint push
    pub player_velocity: Vec2,
    pub frame: u64,
    pub fragments: &'a mut FragmentSet,
    pub sounds: &'a SoundQueue,
    pub player: &'a mut PlayerState,
    pub paint_throttle: &'a mut SoundThrottle,
    pub rng: &'a mut u32,
}

/// Resolve every particle against nearby live brush particles.
///
/// Returns the number of rainbow blobs absorbed.
pub fn resolve_brush_collisions(
    particles: &mut [Particle],
    brushes: &mut BrushSet,
    grid: &mut BrushGrid,
    env: &mut CollisionEnv<'_>,
) -> usize {
    grid.rebuild(
        brushes
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.absorbed)
            .map(|(i, b)| (i, b.x, b.y)),
    );

    let speed = env.player_velocity.length();
    let flow_dir = (speed > 1e-3).then(|| env.player_velocity * (1.0 / speed));

    let blobs = brushes.as_mut_slice();
    let mut absorbed = 0;

    for p in particles.iter_mut() {
        grid.for_each_near(p.x, p.y, |index| {
            let b = &mut blobs[index];
            if b.absorbed {
                return;
            }
            match (p.is_player, b.kind) {
                (false, BrushKind::Paint) => {
                    let surface_r = b.size * BRUSH_SURFACE_FACTOR * SURFACE_RADIUS_FACTOR;
                    let mut dx = p.x - b.x;
                    let mut dy = p.y - b.y;
                    let dist2 = dx * dx + dy * dy;
                    if dist2 >= surface_r * surface_r {
                        return;
                    }
                    let mut dist = dist2.sqrt();
                    if dist < 1e-4 {
                        dx = 0.0;
                        dy = -1.0;
                        dist = 1.0;
                    }
                    let nx = dx / dist;
                    let ny = dy / dist;
                    p.x = b.x + nx * surface_r;
                    p.y = b.y + ny * surface_r;
                    let vn = p.vx * nx + p.vy * ny;
                    if vn < 0.0 {
                        p.vx = (p.vx - vn * nx) * TANGENTIAL_FRICTION;
                        p.vy = (p.vy - vn * ny) * TANGENTIAL_FRICTION;
                    }
                    b.has_water = true;
                }
                (true, BrushKind::Paint) => {
                    let dx = b.x - p.x;
                    let dy = b.y - p.y;
                    let dist2 = dx * dx + dy * dy;
                    let reach = b.size * PLAYER_REACH;
                    if dist2 >= reach * reach {
                        return;
                    }
                    let dist = dist2.sqrt();
                    let dir = if dist > 0.001 {
                        Vec2::new(dx / dist, dy / dist)
                    } else {
                        Vec2::new(0.0, 1.0)
                    };
                    let falloff = 1.0 - dist / reach;
                    let influence = falloff * falloff;

                    let mut shove = dir * PLAYER_PUSH;
                    if let Some(flow) = flow_dir {
                        if flow.dot(dir) > -0.5 {
                            shove += flow * PLAYER_FLOW;
                        }
                    }
                    b.vx += shove.x * influence * PUSH_GAIN;
                    b.vy += shove.y * influence * PUSH_GAIN;
                    b.impact += influence * IMPACT_GAIN;

                    if b.impact > IMPACT_SOUND && env.paint_throttle.ready(env.frame) {
                        env.sounds.enqueue(SoundKind::Paint);
                    }
                }
                (true, BrushKind::Rainbow) => {
                    let reach = b.size * RAINBOW_REACH;
                    if p.dist_sq_to(b.x, b.y) >= reach * reach {
                        return;
                    }
                    b.absorb();
                    env.player.start_rainbow();
                    env.fragments
                        .spawn_rainbow(b.x, b.y, b.age, RAINBOW_ABSORB_INTENSITY, env.rng);
                    env.sounds.enqueue(SoundKind::Rainbow);
                    absorbed += 1;
                }
                _ => {}
            }
        });
    }
    absorbed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::ephemeral::BrushParticle;

    struct Harness {
        fragments: FragmentSet,
        sounds: SoundQueue,
        player: PlayerState,
        throttle: SoundThrottle,
        rng: u32,
        grid: BrushGrid,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                fragments: FragmentSet::new(1000),
                sounds: SoundQueue::new(100),
                player: PlayerState::default(),
                throttle: SoundThrottle::new(PAINT_SOUND_INTERVAL),
                rng: 7,
                grid: BrushGrid::new(800.0, 800.0, 100.0),
            }
        }

        fn resolve(&mut self, particles: &mut [Particle], brushes: &mut BrushSet, velocity: Vec2, frame: u64) -> usize {
            let mut env = CollisionEnv {
                player_velocity: velocity,
                frame,
                fragments: &mut self.fragments,
                sounds: &self.sounds,
                player: &mut self.player,
                paint_throttle: &mut self.throttle,
                rng: &mut self.rng,
            };
            resolve_brush_collisions(particles, brushes, &mut self.grid, &mut env)
        }
    }

    #[test]
    fn water_is_pushed_to_paint_surface() {
        let mut h = Harness::new();
        let mut brushes = BrushSet::new(8);
        brushes.push(BrushParticle::new(200.0, 200.0, 60.0, BrushKind::Paint));
        let mut water = vec![Particle::water(205.0, 200.0, 0)];
        water[0].vx = -3.0;
        water[0].vy = 1.0;

        h.resolve(&mut water, &mut brushes, Vec2::ZERO, 0);

        let surface_r = 60.0 * BRUSH_SURFACE_FACTOR * SURFACE_RADIUS_FACTOR;
        assert!((water[0].x - (200.0 + surface_r)).abs() < 1e-4);
        assert_eq!(water[0].vx, 0.0);
        assert!((water[0].vy - TANGENTIAL_FRICTION).abs() < 1e-6);
        assert!(brushes.as_slice()[0].has_water);
    }

    #[test]
    fn coincident_water_goes_up() {
        let mut h = Harness::new();
        let mut brushes = BrushSet::new(8);
        brushes.push(BrushParticle::new(200.0, 200.0, 60.0, BrushKind::Paint));
        let mut water = vec![Particle::water(200.0, 200.0, 0)];
        h.resolve(&mut water, &mut brushes, Vec2::ZERO, 0);
        assert_eq!(water[0].x, 200.0);
        assert!(water[0].y < 200.0);
    }

    #[test]
    fn player_shoves_paint_and_sound_is_throttled() {
        let mut h = Harness::new();
        let mut brushes = BrushSet::new(8);
        brushes.push(BrushParticle::new(200.0, 200.0, 60.0, BrushKind::Paint));
        let mut players: Vec<Particle> = (0..20).map(|i| Particle::player(195.0, 200.0, i)).collect();

        h.resolve(&mut players, &mut brushes, Vec2::new(1.0, 0.0), 0);
        let b = brushes.as_slice()[0];
        assert!(b.vx > 0.0);
        assert!(b.impact > IMPACT_SOUND);
        assert_eq!(h.sounds.drain(), vec![SoundKind::Paint]);

        h.resolve(&mut players, &mut brushes, Vec2::ZERO, 2);
        assert!(h.sounds.is_empty());
        h.resolve(&mut players, &mut brushes, Vec2::ZERO, PAINT_SOUND_INTERVAL);
        assert_eq!(h.sounds.drain(), vec![SoundKind::Paint]);
    }

    #[test]
    fn player_absorbs_rainbow_once() {
        let mut h = Harness::new();
        let mut brushes = BrushSet::new(8);
        brushes.push(BrushParticle::new(300.0, 300.0, 60.0, BrushKind::Rainbow));
        let mut players = vec![Particle::player(310.0, 300.0, 0), Particle::player(300.0, 310.0, 1)];

        assert_eq!(h.resolve(&mut players, &mut brushes, Vec2::ZERO, 0), 1);
        assert!(brushes.as_slice()[0].absorbed);
        assert!(h.player.rainbow);
        assert!(h.player.jump_timer > 0.0);
        assert_eq!(h.fragments.len(), 24);
        assert_eq!(h.sounds.drain(), vec![SoundKind::Rainbow]);
    }

    #[test]
    fn water_ignores_rainbow_and_far_blobs() {
        let mut h = Harness::new();
        let mut brushes = BrushSet::new(8);
        brushes.push(BrushParticle::new(300.0, 300.0, 60.0, BrushKind::Rainbow));
        brushes.push(BrushParticle::new(600.0, 600.0, 60.0, BrushKind::Paint));
        let mut water = vec![Particle::water(300.0, 300.0, 0)];
        h.resolve(&mut water, &mut brushes, Vec2::ZERO, 0);
        assert_eq!((water[0].x, water[0].y), (300.0, 300.0));
        assert!(!brushes.as_slice()[0].absorbed);
    }

    #[test]
    fn throttle_allows_first_hit_and_spacing() {
        let mut t = SoundThrottle::new(5);
        assert!(t.ready(3));
        assert!(!t.ready(7));
        assert!(t.ready(8));
    }
}
