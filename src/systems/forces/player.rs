use crate::core::Vec2;
use crate::domain::{Force, Particle};

/// Mouse pull coefficient in normal play / while the sun effect is active
const MOUSE_PULL: f32 = 0.01;
const MOUSE_PULL_SUN: f32 = 0.015;

/// Centroid of the player cluster, `None` without player particles
pub fn player_centroid(particles: &[Particle]) -> Option<Vec2> {
    let mut sum = Vec2::ZERO;
    let mut count = 0usize;
    for p in particles.iter().filter(|p| p.is_player) {
        sum += Vec2::new(p.x, p.y);
        count += 1;
    }
    (count > 0).then(|| sum * (1.0 / count as f32))
}

/// Mean velocity of the player cluster (zero without player particles)
pub fn player_mean_velocity(particles: &[Particle]) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0usize;
    for p in particles.iter().filter(|p| p.is_player) {
        sum += Vec2::new(p.vx, p.vy);
        count += 1;
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    sum * (1.0 / count as f32)
}

/// Constant-fraction spring pulling every player particle to the centroid
pub fn apply_player_cohesion(particles: &[Particle], forces: &mut [Force], cohesion: f32) {
    let Some(center) = player_centroid(particles) else {
        return;
    };
    for (p, f) in particles.iter().zip(forces.iter_mut()) {
        if p.is_player {
            *f += (center - Vec2::new(p.x, p.y)) * cohesion;
        }
    }
}

/// Pull the player cluster toward the mouse while the button is held
pub fn apply_mouse_attraction(
    particles: &[Particle],
    forces: &mut [Force],
    mouse: Vec2,
    mouse_down: bool,
    sun_mode: bool,
    mouse_force: f32,
) {
    if !mouse_down {
        return;
    }
    let k = (if sun_mode { MOUSE_PULL_SUN } else { MOUSE_PULL }) * mouse_force;
    for (p, f) in particles.iter().zip(forces.iter_mut()) {
        if p.is_player {
            *f += (mouse - Vec2::new(p.x, p.y)) * k;
        }
    }
}
