//! Multi-octave fractal sums (fBm and ridged fBm) over the lattice primitives.

use glam::Vec3;

use crate::params::{BaseNoiseSettings, FbmSettings, Primitive, RidgedSettings};
use super::hash::octave_seed;
use super::lattice::sample_primitive;

/// Fractal Brownian motion.
///
/// Octave `i` samples `coord * frequency * lacunarity^i + offset` with weight
/// `gain^i` and its own seed; octave 0 uses the layer seed unchanged, so a
/// single octave reproduces the plain primitive. Zero octaves yield 0.
pub fn fbm(
    primitive: Primitive,
    coord: Vec3,
    base: &BaseNoiseSettings,
    fbm: &FbmSettings,
    seed: u32,
) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = base.frequency;
    let mut amplitude_sum = 0.0f32;

    for octave in 0..fbm.octaves {
        let p = coord * frequency + base.offset;
        total += sample_primitive(primitive, p, octave_seed(seed, octave)) * amplitude;
        amplitude_sum += amplitude;
        amplitude *= fbm.gain;
        frequency *= fbm.lacunarity;
    }

    if fbm.normalize && amplitude_sum > 0.0 {
        total /= amplitude_sum;
    }

    total * base.amplitude
}

/// Ridged multifractal. Never negative for a non-negative amplitude.
///
/// Each octave inverts the absolute sample around `ridged.offset`, sharpens
/// it with `ridged.exponent` and is weighted by the previous octave's ridge,
/// which keeps detail concentrated along the crests.
pub fn ridged_fbm(
    primitive: Primitive,
    coord: Vec3,
    base: &BaseNoiseSettings,
    fbm: &FbmSettings,
    ridged: &RidgedSettings,
    seed: u32,
) -> f32 {
    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = base.frequency;
    let mut amplitude_sum = 0.0f32;
    let mut weight = 1.0f32;

    for octave in 0..fbm.octaves {
        let p = coord * frequency + base.offset;
        let n = sample_primitive(primitive, p, octave_seed(seed, octave));

        let signal = (ridged.offset - n.abs()).max(0.0).powf(ridged.exponent) * weight;
        weight = (signal * ridged.weight).clamp(0.0, 1.0);

        total += signal * amplitude;
        amplitude_sum += amplitude;
        amplitude *= fbm.gain;
        frequency *= fbm.lacunarity;
    }

    if fbm.normalize && amplitude_sum > 0.0 {
        total /= amplitude_sum;
    }

    total * base.amplitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn base(frequency: f32, amplitude: f32) -> BaseNoiseSettings {
        BaseNoiseSettings {
            frequency,
            amplitude,
            offset: Vec3::new(0.3, -1.2, 4.5),
        }
    }

    fn random_coords(n: usize) -> Vec<Vec3> {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        (0..n)
            .map(|_| {
                Vec3::new(
                    rng.random_range(-3.0..3.0),
                    rng.random_range(-3.0..3.0),
                    rng.random_range(-3.0..3.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_octave_matches_primitive() {
        let b = base(2.5, 0.7);
        let settings = FbmSettings {
            octaves: 1,
            ..Default::default()
        };
        for primitive in [Primitive::Perlin, Primitive::Simplex, Primitive::Value] {
            for coord in random_coords(100) {
                let expected = b.amplitude * sample_primitive(primitive, b.sample_point(coord), 8);
                assert_eq!(fbm(primitive, coord, &b, &settings, 8), expected);
            }
        }
    }

    #[test]
    fn test_zero_octaves_is_zero() {
        let settings = FbmSettings {
            octaves: 0,
            ..Default::default()
        };
        let b = base(1.0, 1.0);
        let r = RidgedSettings::default();
        assert_eq!(fbm(Primitive::Perlin, Vec3::ONE, &b, &settings, 1), 0.0);
        assert_eq!(ridged_fbm(Primitive::Perlin, Vec3::ONE, &b, &settings, &r, 1), 0.0);
    }

    #[test]
    fn test_normalized_fbm_in_range() {
        let b = base(1.7, 1.0);
        let settings = FbmSettings::default();
        for coord in random_coords(500) {
            let v = fbm(Primitive::Simplex, coord, &b, &settings, 3);
            assert!((-1.0..=1.0).contains(&v), "{:?} -> {}", coord, v);
        }
    }

    #[test]
    fn test_ridged_never_negative() {
        let b = base(1.3, 1.0);
        let settings = FbmSettings::default();
        let ridged = RidgedSettings::default();
        for primitive in [Primitive::Perlin, Primitive::Simplex, Primitive::Value] {
            for coord in random_coords(300) {
                let v = ridged_fbm(primitive, coord, &b, &settings, &ridged, 5);
                assert!(v >= 0.0, "{:?} at {:?} -> {}", primitive, coord, v);
                assert!(v <= 1.0 + 1e-5, "{:?} at {:?} -> {}", primitive, coord, v);
            }
        }
    }

    #[test]
    fn test_zero_frequency_is_constant() {
        let b = base(0.0, 1.0);
        let settings = FbmSettings::default();
        let first = fbm(Primitive::Value, Vec3::ZERO, &b, &settings, 2);
        for coord in random_coords(20) {
            assert_eq!(fbm(Primitive::Value, coord, &b, &settings, 2), first);
        }
    }

    #[test]
    fn test_octaves_add_detail() {
        let b = base(1.0, 1.0);
        let one = FbmSettings {
            octaves: 1,
            normalize: false,
            ..Default::default()
        };
        let many = FbmSettings {
            octaves: 6,
            normalize: false,
            ..Default::default()
        };
        let differs = random_coords(50)
            .into_iter()
            .any(|c| fbm(Primitive::Perlin, c, &b, &one, 4) != fbm(Primitive::Perlin, c, &b, &many, 4));
        assert!(differs);
    }
}
