//! Integrator - temperature, gravity, forces, damping, walls
//!
//! Per particle, in order:
//! 1. water cools toward zero; above the boiling point its velocity is
//!    damped and replaced by temperature-scaled jitter instead of gravity
//! 2. accumulated force is added to velocity
//! 3. damping (players always, water only when not boiling)
//! 4. explicit Euler position update
//! 5. wall reflection: clamp inside with jitter, halve and invert velocity
//!
//! Every particle draws from its own RNG stream keyed by (seed, frame, id),
//! so the serial and rayon passes give the same result.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::random::{below, stream_seed};
use crate::domain::{Force, Particle, SimConfig};

/// Particles parked left of this are inactive and skipped
pub const INACTIVE_X: f32 = -5000.0;
/// Velocity kept by a boiling particle before jitter is added
const BOILING_DAMP: f32 = 0.9;
const BOILING_JITTER: f32 = 0.5;
const WALL_BOUNCE: f32 = -0.5;

#[derive(Clone, Copy, Debug)]
pub struct IntegrateParams {
    pub damping: f32,
    pub gravity: f32,
    pub boiling_point: f32,
    pub cooling_rate: f32,
    pub wall_radius: f32,
    pub width: f32,
    pub height: f32,
    pub seed: u32,
    pub frame: u64,
}

impl IntegrateParams {
    pub fn from_config(config: &SimConfig, width: f32, height: f32, frame: u64) -> Self {
        Self {
            damping: config.damping,
            gravity: config.gravity,
            boiling_point: config.boiling_point,
            cooling_rate: config.cooling_rate,
            wall_radius: config.wall_radius,
            width,
            height,
            seed: config.seed,
            frame,
        }
    }
}

/// Integrate every particle with its accumulated force
pub fn integrate(particles: &mut [Particle], forces: &[Force], params: &IntegrateParams) {
    debug_assert_eq!(particles.len(), forces.len());

    #[cfg(feature = "parallel")]
    {
        particles
            .par_iter_mut()
            .zip(forces.par_iter())
            .for_each(|(p, f)| integrate_one(p, *f, params));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (p, f) in particles.iter_mut().zip(forces.iter()) {
            integrate_one(p, *f, params);
        }
    }
}

#[inline]
pub fn integrate_one(p: &mut Particle, force: Force, params: &IntegrateParams) {
    if p.x < INACTIVE_X {
        return;
    }
    let mut rng = stream_seed(params.seed, params.frame, p.id);

    let mut boiling = false;
    if !p.is_player {
        if p.temperature > 0.0 {
            p.temperature = (p.temperature - params.cooling_rate).max(0.0);
        }
        let temp = p.temperature;
        if temp > params.boiling_point {
            boiling = true;
            p.vx *= BOILING_DAMP;
            p.vy *= BOILING_DAMP;
            let strength = (temp - params.boiling_point) * BOILING_JITTER;
            p.vx += (below(&mut rng, 100) as f32 / 50.0 - 1.0) * strength;
            p.vy += (below(&mut rng, 100) as f32 / 50.0 - 1.0) * strength;
        } else {
            p.vy += params.gravity;
        }
    }

    p.vx += force.x;
    p.vy += force.y;

    if !boiling {
        p.vx *= params.damping;
        p.vy *= params.damping;
    }

    p.x += p.vx;
    p.y += p.vy;

    let jitter = (below(&mut rng, 16)) as f32 * 0.01;
    reflect_walls(p, params, jitter);
}

/// Clamp a particle inside the walls, bouncing inelastically
#[inline]
pub fn reflect_walls(p: &mut Particle, params: &IntegrateParams, jitter: f32) {
    let r = params.wall_radius;
    if p.x < r {
        p.x = r + jitter;
        p.vx *= WALL_BOUNCE;
    }
    if p.x > params.width - r {
        p.x = params.width - r - jitter;
        p.vx *= WALL_BOUNCE;
    }
    if p.y < r {
        p.y = r + jitter;
        p.vy *= WALL_BOUNCE;
    }
    if p.y > params.height - r {
        p.y = params.height - r - jitter;
        p.vy *= WALL_BOUNCE;
    }
}
