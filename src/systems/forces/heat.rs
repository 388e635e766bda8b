use crate::domain::Particle;
use crate::spatial::SpatialGrid;
use crate::systems::ephemeral::Fragment;

/// Reach of a hot fragment
pub const HEAT_RADIUS: f32 = 30.0;
/// Temperature a heated water particle is set to
pub const HEAT_TEMPERATURE: f32 = 3.0;
/// Fraction of the fragment velocity handed to heated particles
const HEAT_KICK: f32 = 0.15;

/// Heat water particles near embers and heat blobs.
///
/// Only every second heat-carrying fragment is applied (fragment order is
/// arbitrary, so this halves the cost without a visible bias). Fragments
/// outside the world are skipped. Must run after the grid rebuild: the
/// particle buffer is expected in cell order.
pub fn apply_heat_from_fragments(
    fragments: &[Fragment],
    particles: &mut [Particle],
    grid: &SpatialGrid,
    width: f32,
    height: f32,
) -> usize {
    let radius_sq = HEAT_RADIUS * HEAT_RADIUS;
    let mut heated = 0;

    let hot = fragments.iter().filter(|f| f.kind.carries_heat());
    for fragment in hot.skip(1).step_by(2) {
        if !(fragment.x >= 0.0 && fragment.x < width && fragment.y >= 0.0 && fragment.y < height) {
            continue;
        }
        let (cx, cy) = grid.cell_coords(fragment.x, fragment.y);

        for cell in grid.neighborhood(cx, cy) {
            for i in grid.cell_range(cell) {
                let p = fast_mut!(particles, [i]);
                if p.is_player {
                    continue;
                }
                if p.dist_sq_to(fragment.x, fragment.y) < radius_sq {
                    p.temperature = HEAT_TEMPERATURE;
                    p.vx += fragment.vx * HEAT_KICK;
                    p.vy += fragment.vy * HEAT_KICK;
                    heated += 1;
                }
            }
        }
    }
    heated
}
