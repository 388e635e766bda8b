use crate::core::Vec2;

use super::{ForceParams, ForceView};

/// Density-driven force on water particle `i` (slot in the cell-ordered
/// buffer) sitting in grid cell (cx, cy).
///
/// Dense coarse cells: push away from the centroid of up to
/// `density_sample_cap` nearby water particles (crude surface tension).
/// Otherwise: follow the negative density gradient to smooth the field.
/// Particles on the border ring of the density field get nothing.
pub fn density_term(i: usize, cx: usize, cy: usize, view: ForceView<'_>, params: &ForceParams) -> Vec2 {
    let particles = view.particles;
    let density = view.density;
    let p = fast!(particles, [i]);

    let Some((bx, by)) = density.cell_coords(p.x, p.y) else {
        return Vec2::ZERO;
    };
    if !density.is_interior(bx, by) {
        return Vec2::ZERO;
    }

    if density.get(bx, by) > params.density_high_threshold {
        let mut sum = Vec2::ZERO;
        let mut samples = 0usize;

        'scan: for cell in view.grid.neighborhood(cx, cy) {
            for k in view.grid.cell_range(cell) {
                if samples >= params.density_sample_cap {
                    break 'scan;
                }
                let q = fast!(particles, [k]);
                if k == i || q.is_player {
                    continue;
                }
                if p.dist_sq_to(q.x, q.y) < params.density_sample_radius_sq {
                    sum += Vec2::new(q.x, q.y);
                    samples += 1;
                }
            }
        }

        if samples == 0 {
            return Vec2::ZERO;
        }
        let centroid = sum * (1.0 / samples as f32);
        (Vec2::new(p.x, p.y) - centroid) * params.density_separation
    } else {
        -(density.gradient(bx, by) * params.density_gradient)
    }
}
