//! Worley (cellular) noise, F2 - F1.

use glam::Vec3;

use crate::params::WorleySettings;
use super::hash::{hash3, lattice, mix, unit_f32};

/// Returns the feature point of a cell, relative to that cell's origin.
#[inline]
fn feature_point(cell: (i32, i32, i32), seed: u32, jitter: f32) -> Vec3 {
    let h = hash3(cell.0, cell.1, cell.2, seed);
    let r = Vec3::new(
        unit_f32(h),
        unit_f32(mix(h ^ 0x68e3_1da4)),
        unit_f32(mix(h ^ 0xb529_7a4d)),
    );
    Vec3::splat(0.5) + (r - 0.5) * jitter
}

/// Distances to the nearest and second-nearest feature points around `p`.
pub fn nearest_two(p: Vec3, worley: &WorleySettings, seed: u32) -> (f32, f32) {
    let (xi, xf) = lattice(p.x);
    let (yi, yf) = lattice(p.y);
    let (zi, zf) = lattice(p.z);
    let local = Vec3::new(xf, yf, zf);
    let jitter = worley.jitter.clamp(0.0, 1.0);

    let mut f1 = f32::MAX;
    let mut f2 = f32::MAX;

    for dz in -1..=1 {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let cell = (xi.wrapping_add(dx), yi.wrapping_add(dy), zi.wrapping_add(dz));
                let offset = Vec3::new(dx as f32, dy as f32, dz as f32);
                let feature = offset + feature_point(cell, seed, jitter);
                let d = worley.metric.distance(feature, local);
                if d < f1 {
                    f2 = f1;
                    f1 = d;
                } else if d < f2 {
                    f2 = d;
                }
            }
        }
    }

    (f1, f2)
}

/// `F2 - F1` at `p`; zero on cell borders, never negative.
pub fn worley_f2_f1(p: Vec3, worley: &WorleySettings, seed: u32) -> f32 {
    let (f1, f2) = nearest_two(p, worley, seed.wrapping_add(worley.seed_offset));
    (f2 - f1).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DistanceMetric;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn sample_points(n: usize) -> Vec<Vec3> {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        (0..n)
            .map(|_| {
                Vec3::new(
                    rng.random_range(-20.0..20.0),
                    rng.random_range(-20.0..20.0),
                    rng.random_range(-20.0..20.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_f2_f1_non_negative_for_every_metric() {
        for metric in DistanceMetric::all() {
            let settings = WorleySettings {
                metric,
                ..Default::default()
            };
            for p in sample_points(300) {
                let v = worley_f2_f1(p, &settings, 6);
                assert!(v >= 0.0 && v.is_finite(), "{:?} at {:?} -> {}", metric, p, v);
            }
        }
    }

    #[test]
    fn test_nearest_ordering() {
        let settings = WorleySettings::default();
        for p in sample_points(100) {
            let (f1, f2) = nearest_two(p, &settings, 1);
            assert!(f1 <= f2);
            // With full jitter the nearest point is always inside the 3x3x3 block.
            assert!(f1 < 3.0_f32.sqrt());
        }
    }

    #[test]
    fn test_zero_jitter_is_regular_grid() {
        let settings = WorleySettings {
            jitter: 0.0,
            ..Default::default()
        };
        // Cell centers are feature points, so F1 is zero there.
        let (f1, f2) = nearest_two(Vec3::new(2.5, -3.5, 0.5), &settings, 99);
        assert!(f1.abs() < 1e-6);
        assert!((f2 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_seed_offset_shifts_pattern() {
        let p = Vec3::new(0.41, 7.3, -2.2);
        let a = WorleySettings::default();
        let b = WorleySettings {
            seed_offset: 12,
            ..Default::default()
        };
        assert_ne!(worley_f2_f1(p, &a, 5), worley_f2_f1(p, &b, 5));
        assert_eq!(worley_f2_f1(p, &b, 5), worley_f2_f1(p, &a, 17));
    }
}
