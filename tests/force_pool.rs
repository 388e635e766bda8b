use std::sync::Arc;

use starfall_engine::core::random::range_f32;
use starfall_engine::domain::Force;
use starfall_engine::spatial::{DensityField, SpatialGrid};
use starfall_engine::systems::forces::{accumulate_all, pair_push};
use starfall_engine::systems::{ForceParams, ParticleField, WorkerPool};
use starfall_engine::{Particle, SimConfig};

fn field(count: usize, players: usize, seed: u32) -> ParticleField {
    let config = SimConfig::default();
    let mut rng = seed;
    let particles = (0..count)
        .map(|i| {
            let x = range_f32(&mut rng, 20.0, 620.0);
            let y = range_f32(&mut rng, 20.0, 460.0);
            Particle::new(x, y, i < players, i as u32)
        })
        .collect();
    let mut field = ParticleField::new(
        particles,
        SpatialGrid::new(640.0, 480.0, config.grid_cell_size),
        DensityField::new(640.0, 480.0, config.density_scale),
    );
    field.rebuild(&mut Vec::new());
    field
}

fn close(a: Force, b: Force) -> bool {
    (a.x - b.x).abs() <= 1e-4 && (a.y - b.y).abs() <= 1e-4
}

#[test]
fn pool_matches_serial_for_any_worker_count() {
    let params = ForceParams::default();
    let field = Arc::new(field(2500, 300, 77));

    let mut serial = vec![Force::ZERO; field.particles.len()];
    accumulate_all(field.view(), &params, &mut serial);

    for workers in 1..=8 {
        let mut pool = WorkerPool::new(workers).expect("spawn workers");
        let mut pooled = vec![Force::ZERO; field.particles.len()];
        let keys: Arc<[usize]> = field.grid.active_cells().into();
        let shards = pool.run(keys, &field, params, &mut pooled);
        assert_eq!(shards, workers.min(field.grid.active_cells().len()));

        for (i, (s, p)) in serial.iter().zip(pooled.iter()).enumerate() {
            assert!(close(*s, *p), "workers {workers}, particle {i}: {s:?} vs {p:?}");
        }
    }
}

#[test]
fn repeated_dispatches_do_not_accumulate_stale_forces() {
    let params = ForceParams::default();
    let field = Arc::new(field(800, 0, 5));
    let mut pool = WorkerPool::new(3).expect("spawn workers");
    let keys: Arc<[usize]> = field.grid.active_cells().into();

    let mut first = vec![Force::ZERO; field.particles.len()];
    pool.run(Arc::clone(&keys), &field, params, &mut first);
    let mut second = vec![Force::ZERO; field.particles.len()];
    pool.run(keys, &field, params, &mut second);
    assert_eq!(first, second);
}

#[test]
fn pair_push_obeys_third_law() {
    let params = ForceParams::default();
    let pairs = [
        (Particle::water(100.0, 100.0, 0), Particle::water(112.0, 95.0, 1)),
        (Particle::player(50.0, 50.0, 0), Particle::water(70.0, 80.0, 1)),
        (Particle::player(10.0, 10.0, 0), Particle::player(3.0, 14.0, 1)),
    ];
    for (a, b) in pairs {
        let on_b = pair_push(&a, &b, &params).expect("pair in range");
        let on_a = pair_push(&b, &a, &params).expect("pair in range");
        assert!((on_a.x + on_b.x).abs() < 1e-6);
        assert!((on_a.y + on_b.y).abs() < 1e-6);
    }
}

#[test]
fn pairwise_forces_sum_to_zero_without_density() {
    // all players: the density term only applies to water
    let params = ForceParams::default();
    let field = field(600, 600, 9);
    let mut out = vec![Force::ZERO; field.particles.len()];
    accumulate_all(field.view(), &params, &mut out);

    let total = out.iter().fold(Force::ZERO, |acc, f| acc + *f);
    let magnitude: f32 = out.iter().map(|f| f.length()).sum();
    assert!(magnitude > 0.0);
    assert!(total.length() < 1e-3 * magnitude.max(1.0), "net force {total:?}");
}

#[test]
fn grid_pass_applies_each_pair_exactly_once() {
    // all players, so the grid pass is pure pair repulsion
    let params = ForceParams::default();
    let field = field(800, 800, 31);
    let particles = &field.particles;

    let mut grid_forces = vec![Force::ZERO; particles.len()];
    accumulate_all(field.view(), &params, &mut grid_forces);

    let mut brute = vec![Force::ZERO; particles.len()];
    for i in 0..particles.len() {
        for j in i + 1..particles.len() {
            if let Some(push) = pair_push(&particles[i], &particles[j], &params) {
                brute[i] -= push;
                brute[j] += push;
            }
        }
    }

    let touched = brute.iter().filter(|f| f.length() > 0.0).count();
    assert!(touched > 100, "only {touched} particles in range");
    for (i, (g, b)) in grid_forces.iter().zip(brute.iter()).enumerate() {
        assert!(close(*g, *b), "particle {i}: grid {g:?} vs all pairs {b:?}");
    }
}

#[test]
fn near_coincident_pairs_are_skipped() {
    let params = ForceParams::default();
    let a = Particle::water(100.0, 100.0, 0);
    // 0.02 apart: dist^2 = 0.0004, under min_distance_sq
    assert!(pair_push(&a, &Particle::water(100.02, 100.0, 1), &params).is_none());
    assert!(pair_push(&a, &Particle::player(100.0, 100.02, 1), &params).is_none());
    // just past the threshold the push is applied
    assert!(pair_push(&a, &Particle::water(100.04, 100.0, 1), &params).is_some());
}
