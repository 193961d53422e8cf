//! Single entry point that dispatches a resolved layer to its noise algorithm.

use glam::Vec3;

use crate::params::{BaseNoiseSettings, NoiseLayerSettings, NoiseType};
use super::cellular::worley_f2_f1;
use super::curl::curl_intensity;
use super::fractal::{fbm, ridged_fbm};
use super::lattice::sample_primitive;

/// Evaluates one noise layer at `coord`, before the layer weight is applied.
///
/// Pure and deterministic: the same coordinate and settings always give the
/// same value on any thread.
pub fn evaluate(coord: Vec3, settings: &NoiseLayerSettings) -> f32 {
    let base = &settings.base;
    match settings.noise_type {
        NoiseType::WorleyF2F1 => {
            base.amplitude * worley_f2_f1(base.sample_point(coord), &settings.worley, settings.seed)
        }
        NoiseType::CurlIntensity => evaluate_curl(coord, settings),
        noise_type => match noise_type.primitive() {
            Some(primitive) if noise_type.is_ridged() => ridged_fbm(
                primitive,
                coord,
                base,
                &settings.fbm,
                &settings.ridged,
                settings.seed,
            ),
            Some(primitive) if noise_type.is_fbm() => {
                fbm(primitive, coord, base, &settings.fbm, settings.seed)
            }
            Some(primitive) => {
                base.amplitude * sample_primitive(primitive, base.sample_point(coord), settings.seed)
            }
            None => 0.0,
        },
    }
}

fn evaluate_curl(coord: Vec3, settings: &NoiseLayerSettings) -> f32 {
    let curl = &settings.curl;
    // A curl potential built from curl noise would recurse forever.
    if curl.base_noise_type == NoiseType::CurlIntensity {
        return 0.0;
    }

    let mut potential_settings = *settings;
    potential_settings.noise_type = curl.base_noise_type;
    potential_settings.base = BaseNoiseSettings {
        frequency: curl.base_frequency,
        amplitude: curl.base_amplitude,
        offset: Vec3::ZERO,
    };

    let p = settings.base.sample_point(coord);
    let seed = settings.seed.wrapping_add(curl.seed_offset);
    let magnitude = curl_intensity(p, seed, curl.step_size, |q, component_seed| {
        let mut s = potential_settings;
        s.seed = component_seed;
        evaluate(q, &s)
    });

    settings.base.amplitude * magnitude
}
