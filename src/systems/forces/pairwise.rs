use crate::core::Vec2;
use crate::domain::{Force, Particle};

use super::{density_term, ForceParams, ForceView};

/// Repulsion between two particles, as the push applied to `b`
/// (`a` receives the negation).
///
/// Same-type pairs use the short radius, player/water pairs the long one
/// with the stronger coefficient. Magnitude is linear in
/// `radius - distance`; zero at or beyond the radius and for coincident
/// pairs (`dist^2 <= min_distance_sq`).
#[inline(always)]
pub fn pair_push(a: &Particle, b: &Particle, params: &ForceParams) -> Option<Vec2> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dist2 = dx * dx + dy * dy;

    let mixed = a.is_player != b.is_player;
    let radius_sq = if mixed { params.player_radius_sq } else { params.interaction_radius_sq };
    if dist2 >= radius_sq || dist2 <= params.min_distance_sq {
        return None;
    }

    let dist = dist2.sqrt();
    let (radius, coeff) = if mixed {
        (params.player_radius, params.coeff_mixed)
    } else {
        (params.interaction_radius, params.coeff_same)
    };
    let scalar = (radius - dist) * coeff / dist;
    Some(Vec2::new(dx * scalar, dy * scalar))
}

/// Accumulate forces for every particle in the given cells into `out`.
///
/// Each unordered pair is applied once: a pair (i, j) with i < j in the
/// cell-ordered buffer is only handled while scanning i, and j's cell is
/// always inside i's 3x3 block, so with unique `cell_keys` no pair is seen
/// from two (cell, neighbour) combinations. Writes may land on particles
/// outside the given cells, so `out` must cover the whole buffer.
pub fn accumulate_cell_forces(
    cell_keys: &[usize],
    view: ForceView<'_>,
    params: &ForceParams,
    out: &mut [Force],
) {
    let grid = view.grid;
    let particles = view.particles;
    debug_assert!(out.len() >= particles.len());

    for &cell in cell_keys {
        let own = grid.cell_range(cell);
        if own.is_empty() {
            continue;
        }
        let (cx, cy) = grid.coords(cell);

        for i in own {
            let p1 = fast!(particles, [i]);

            for neighbor in grid.neighborhood(cx, cy) {
                for j in grid.cell_range(neighbor) {
                    if i >= j {
                        continue;
                    }
                    let p2 = fast!(particles, [j]);
                    if let Some(push) = pair_push(p1, p2, params) {
                        *fast_mut!(out, [i]) -= push;
                        *fast_mut!(out, [j]) += push;
                    }
                }
            }

            if !p1.is_player {
                *fast_mut!(out, [i]) += density_term(i, cx, cy, view, params);
            }
        }
    }
}

/// Single-threaded pass over every active cell
pub fn accumulate_all(view: ForceView<'_>, params: &ForceParams, out: &mut [Force]) {
    accumulate_cell_forces(view.grid.active_cells(), view, params, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Particle;

    #[test]
    fn push_obeys_third_law_and_separates() {
        let params = ForceParams::default();
        let a = Particle::water(100.0, 100.0, 0);
        let b = Particle::water(110.0, 100.0, 1);
        let push = pair_push(&a, &b, &params).expect("within radius");
        // b is pushed in +x, a receives -push
        assert!(push.x > 0.0);
        assert_eq!(push.y, 0.0);
        let expected = (params.interaction_radius - 10.0) * params.coeff_same;
        assert!((push.x - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_at_radius_and_when_coincident() {
        let params = ForceParams::default();
        let a = Particle::water(50.0, 50.0, 0);
        let at_radius = Particle::water(50.0 + params.interaction_radius, 50.0, 1);
        let same_spot = Particle::water(50.0, 50.0, 2);
        assert!(pair_push(&a, &at_radius, &params).is_none());
        assert!(pair_push(&a, &same_spot, &params).is_none());
    }

    #[test]
    fn mixed_pairs_use_long_radius_and_stronger_coefficient() {
        let params = ForceParams::default();
        let water = Particle::water(0.0, 0.0, 0);
        let water2 = Particle::water(30.0, 0.0, 1);
        let player = Particle::player(30.0, 0.0, 2);
        assert!(pair_push(&water, &water2, &params).is_none());
        let push = pair_push(&water, &player, &params).expect("mixed pair in range");
        let expected = (params.player_radius - 30.0) * params.coeff_mixed;
        assert!((push.x - expected).abs() < 1e-6);
    }
}
