// Host-side tests for particle motion, reflection and shimmer.

use backdrop_core::constants::*;
use backdrop_core::scene::{reflect_axis, ParticlePattern, ParticleSystem};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME_SEC: f32 = 1.0 / 60.0;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn reflect_axis_flips_and_damps_outward_motion() {
    let mut v = 5.0;
    assert!(reflect_axis(404.0, &mut v, 400.0));
    assert!(approx(v, -4.0));

    let mut v = -2.0;
    assert!(reflect_axis(-401.0, &mut v, 400.0));
    assert!(approx(v, 1.6));
}

#[test]
fn reflect_axis_fires_outside_bound_regardless_of_direction() {
    let mut v = -4.0;
    assert!(reflect_axis(402.0, &mut v, 400.0));
    assert!(approx(v, 3.2));
}

#[test]
fn reflect_axis_leaves_interior_alone() {
    let mut v = 3.0;
    assert!(!reflect_axis(399.0, &mut v, 400.0));
    assert_eq!(v, 3.0);

    let mut v = 3.0;
    assert!(!reflect_axis(400.0, &mut v, 400.0));
    assert_eq!(v, 3.0);
}

#[test]
fn particle_outside_box_moving_inward_is_still_reflected() {
    let mut sys = ParticleSystem::from_parts(
        ParticlePattern::Sphere,
        vec![Vec3::new(0.0, 450.0, 0.0)],
        vec![Vec3::new(0.0, -1.0, 0.0)],
        vec![[1.0, 1.0, 1.0]],
    )
    .expect("parallel arrays");
    sys.update(0.0);
    assert!(approx(sys.positions()[0].y, 449.0));
    assert!(approx(sys.velocities()[0].y, 0.8));
}

#[test]
fn particle_leaving_box_comes_back_damped() {
    let mut sys = ParticleSystem::from_parts(
        ParticlePattern::Random,
        vec![Vec3::new(399.0, 0.0, 0.0)],
        vec![Vec3::new(5.0, 0.0, 0.0)],
        vec![[1.0, 1.0, 1.0]],
    )
    .expect("parallel arrays");

    let mut first_reflection = None;
    for frame in 0..1000 {
        let before = sys.velocities()[0].x;
        sys.update(frame as f32 * FRAME_SEC);
        let after = sys.velocities()[0].x;
        if after != before {
            // Every reflection reverses the sign and keeps 80% of the speed.
            assert!(approx(after, -before * REFLECTION_DAMPING), "frame {}: {} -> {}", frame, before, after);
            first_reflection.get_or_insert((frame, after));
        }
        assert_eq!(sys.velocities()[0].y, 0.0);
        assert_eq!(sys.velocities()[0].z, 0.0);
    }

    let (frame, v) = first_reflection.expect("particle reflected");
    assert_eq!(frame, 0);
    assert!(approx(v, -4.0));
    assert!(sys.positions()[0].x.abs() < PARTICLE_BOUND_XZ + 10.0);
}

#[test]
fn reflection_applies_per_axis_whenever_outside_bound() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut sys = ParticleSystem::generate(ParticlePattern::Random, 300, &mut rng);
    for frame in 0..2000 {
        let prev: Vec<Vec3> = sys.velocities().to_vec();
        sys.update(frame as f32 * FRAME_SEC);
        for ((p, v), pv) in sys.positions().iter().zip(sys.velocities()).zip(&prev) {
            let axes = [
                (p.x, v.x, pv.x, PARTICLE_BOUND_XZ),
                (p.y, v.y, pv.y, PARTICLE_BOUND_Y),
                (p.z, v.z, pv.z, PARTICLE_BOUND_XZ),
            ];
            for (pos, vel, prev_vel, bound) in axes {
                if pos.abs() > bound {
                    assert!(approx(vel, -prev_vel * REFLECTION_DAMPING));
                } else {
                    assert_eq!(vel, prev_vel);
                }
            }
        }
    }
}

#[test]
fn update_never_changes_particle_count() {
    let mut rng = StdRng::seed_from_u64(11);
    for pattern in [ParticlePattern::Random, ParticlePattern::Spiral, ParticlePattern::Sphere] {
        let mut sys = ParticleSystem::generate(pattern, 250, &mut rng);
        for frame in 0..120 {
            sys.update(frame as f32 * FRAME_SEC);
        }
        assert_eq!(sys.count(), 250);
        assert_eq!(sys.positions().len(), 250);
        assert_eq!(sys.velocities().len(), 250);
        assert_eq!(sys.colors().len(), 250);
        assert_eq!(sys.base_colors().len(), 250);
        assert_eq!(sys.pattern(), pattern);
    }
}

#[test]
fn shimmer_scales_base_colors_within_band() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut sys = ParticleSystem::generate(ParticlePattern::Spiral, 64, &mut rng);
    for frame in 0..600 {
        sys.update(frame as f32 * 0.05);
        for (c, base) in sys.colors().iter().zip(sys.base_colors()) {
            for ch in 0..3 {
                if base[ch] > 1e-3 {
                    let k = c[ch] / base[ch];
                    assert!((0.2 - 1e-4..=0.8 + 1e-4).contains(&k), "intensity {}", k);
                }
            }
        }
    }
}

#[test]
fn generated_clouds_respect_their_shapes() {
    let mut rng = StdRng::seed_from_u64(42);

    let random = ParticleSystem::generate(ParticlePattern::Random, 500, &mut rng);
    for (p, v) in random.positions().iter().zip(random.velocities()) {
        assert!(p.x.abs() <= PARTICLE_BOUND_XZ && p.z.abs() <= PARTICLE_BOUND_XZ);
        assert!(p.y.abs() <= PARTICLE_BOUND_Y);
        assert!(v.abs().max_element() <= PARTICLE_MAX_SPEED);
    }

    let spiral = ParticleSystem::generate(ParticlePattern::Spiral, 500, &mut rng);
    for (i, p) in spiral.positions().iter().enumerate() {
        let expected = i as f32 / 500.0 * SPIRAL_MAX_RADIUS;
        assert!((Vec3::new(p.x, 0.0, p.z).length() - expected).abs() < 1e-2);
        assert!(p.y.abs() <= SPIRAL_THICKNESS);
    }

    let sphere = ParticleSystem::generate(ParticlePattern::Sphere, 500, &mut rng);
    for p in sphere.positions() {
        let r = p.length();
        assert!(r >= SPHERE_MIN_RADIUS - 1e-2 && r <= SPHERE_MAX_RADIUS + 1e-2);
    }
}

#[test]
fn generation_is_deterministic_for_a_seed() {
    let a = ParticleSystem::generate(ParticlePattern::Sphere, 100, &mut StdRng::seed_from_u64(9));
    let b = ParticleSystem::generate(ParticlePattern::Sphere, 100, &mut StdRng::seed_from_u64(9));
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.velocities(), b.velocities());
    assert_eq!(a.base_colors(), b.base_colors());
}

#[test]
fn from_parts_rejects_mismatched_arrays() {
    let sys = ParticleSystem::from_parts(
        ParticlePattern::Random,
        vec![Vec3::ZERO, Vec3::ONE],
        vec![Vec3::ZERO],
        vec![[0.0; 3], [0.0; 3]],
    );
    assert!(sys.is_none());
}

#[test]
fn empty_system_updates_cleanly() {
    let mut sys = ParticleSystem::generate(ParticlePattern::Random, 0, &mut StdRng::seed_from_u64(1));
    sys.update(1.0);
    assert_eq!(sys.count(), 0);
}
