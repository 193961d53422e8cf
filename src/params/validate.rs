//! Parameter validation.
//!
//! Invalid values are rejected, never clamped, so a request either runs with
//! exactly the parameters given or does not run at all.

use thiserror::Error;

use super::surface::{NoiseLayer, PlanetSurfaceParams};
use super::types::{NoiseType, OutputProcessingSettings, MAX_OCTAVES};

/// Largest sample coordinate magnitude a layer may reach.
///
/// Keeps every intermediate of the lattice primitives (skewing, neighbor
/// offsets, curl steps) finite in f32.
pub const MAX_SAMPLE_EXTENT: f32 = 1.0e30;

/// Errors reported by [`PlanetSurfaceParams::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("Layer {layer}: frequency must be positive, got {value}")]
    NonPositiveFrequency { layer: usize, value: f32 },
    #[error("Layer {layer}: octave count must lie in 1..={max}, got {value}", max = MAX_OCTAVES)]
    InvalidOctaveCount { layer: usize, value: u32 },
    #[error("Layer {layer}: gain must lie strictly between 0 and 1, got {value}")]
    GainOutOfRange { layer: usize, value: f32 },
    #[error("Layer {layer}: lacunarity must be greater than 1, got {value}")]
    LacunarityTooSmall { layer: usize, value: f32 },
    #[error("Layer {layer}: Worley jitter must lie in [0, 1], got {value}")]
    JitterOutOfRange { layer: usize, value: f32 },
    #[error("Layer {layer}: invalid ridge settings: {reason}")]
    InvalidRidgeSettings { layer: usize, reason: &'static str },
    #[error("Layer {layer}: invalid curl settings: {reason}")]
    InvalidCurlSettings { layer: usize, reason: &'static str },
    #[error("Layer {layer}: sample coordinates reach {extent:e}, above the supported {max:e}", max = MAX_SAMPLE_EXTENT)]
    SampleDomainTooLarge { layer: usize, extent: f32 },
    #[error("Non-finite value in {field}")]
    NonFinite { field: &'static str },
    #[error("Invalid expected input range: min ({min}) >= max ({max})")]
    InvalidOutputRange { min: f32, max: f32 },
    #[error("Output exponent must be positive, got {0}")]
    NonPositiveExponent(f32),
    #[error("Sphere radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("At least one noise layer is required")]
    NoLayers,
}

fn finite(value: f32, field: &'static str) -> Result<(), ParamError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::NonFinite { field })
    }
}

/// Checks one layer; `layer` is its index, used in error reports.
pub(crate) fn validate_layer(layer: usize, l: &NoiseLayer) -> Result<(), ParamError> {
    finite(l.weight, "layer.weight")?;
    finite(l.base.amplitude, "layer.base.amplitude")?;
    if !l.base.offset.is_finite() {
        return Err(ParamError::NonFinite { field: "layer.base.offset" });
    }

    // `!(x > 0.0)` also rejects NaN.
    if !(l.base.frequency > 0.0) || !l.base.frequency.is_finite() {
        return Err(ParamError::NonPositiveFrequency { layer, value: l.base.frequency });
    }

    if !(1..=MAX_OCTAVES).contains(&l.fbm.octaves) {
        return Err(ParamError::InvalidOctaveCount { layer, value: l.fbm.octaves });
    }
    if !(l.fbm.gain > 0.0 && l.fbm.gain < 1.0) {
        return Err(ParamError::GainOutOfRange { layer, value: l.fbm.gain });
    }
    if !(l.fbm.lacunarity > 1.0) || !l.fbm.lacunarity.is_finite() {
        return Err(ParamError::LacunarityTooSmall { layer, value: l.fbm.lacunarity });
    }

    if !(0.0..=1.0).contains(&l.worley.jitter) {
        return Err(ParamError::JitterOutOfRange { layer, value: l.worley.jitter });
    }

    let r = &l.ridged;
    if !(r.exponent > 0.0) || !r.exponent.is_finite() {
        return Err(ParamError::InvalidRidgeSettings { layer, reason: "exponent must be positive" });
    }
    if !(r.offset >= 1.0) || !r.offset.is_finite() {
        return Err(ParamError::InvalidRidgeSettings { layer, reason: "offset must be at least 1" });
    }
    if !(r.weight >= 0.0) || !r.weight.is_finite() {
        return Err(ParamError::InvalidRidgeSettings { layer, reason: "weight must be non-negative" });
    }

    let c = &l.curl;
    if c.base_noise_type == NoiseType::CurlIntensity {
        return Err(ParamError::InvalidCurlSettings {
            layer,
            reason: "base noise cannot itself be curl noise",
        });
    }
    if !(c.base_frequency > 0.0) || !c.base_frequency.is_finite() {
        return Err(ParamError::NonPositiveFrequency { layer, value: c.base_frequency });
    }
    finite(c.base_amplitude, "layer.curl.base_amplitude")?;
    if !(c.step_size > 0.0) || !c.step_size.is_finite() {
        return Err(ParamError::InvalidCurlSettings { layer, reason: "step size must be positive" });
    }

    Ok(())
}

/// Upper bound on the magnitude of any coordinate a layer samples when the
/// unit-domain projection is scaled by `radius`. Computed in f32 the same
/// way the octave loops step their frequency, so overflow shows up as inf.
fn sample_extent(radius: f32, l: &NoiseLayer) -> f32 {
    let top_frequency = |noise_type: NoiseType, frequency: f32| {
        let octaves = if noise_type.is_fractal() { l.fbm.octaves } else { 1 };
        (1..octaves).fold(frequency, |f, _| f * l.fbm.lacunarity)
    };
    let offset = l.base.offset.abs().max_element();
    match l.noise_type {
        NoiseType::CurlIntensity => {
            let p = radius * l.base.frequency + offset + l.curl.step_size;
            p * top_frequency(l.curl.base_noise_type, l.curl.base_frequency)
        }
        noise_type => radius * top_frequency(noise_type, l.base.frequency) + offset,
    }
}

pub(crate) fn validate_output(out: &OutputProcessingSettings) -> Result<(), ParamError> {
    finite(out.baseline, "output.baseline")?;
    finite(out.expected_input_min, "output.expected_input_min")?;
    finite(out.expected_input_max, "output.expected_input_max")?;
    if (out.normalize_output_01 || out.clamp_output)
        && out.expected_input_min >= out.expected_input_max
    {
        return Err(ParamError::InvalidOutputRange {
            min: out.expected_input_min,
            max: out.expected_input_max,
        });
    }
    if !(out.exponent > 0.0) || !out.exponent.is_finite() {
        return Err(ParamError::NonPositiveExponent(out.exponent));
    }
    Ok(())
}

pub(crate) fn validate_surface(params: &PlanetSurfaceParams) -> Result<(), ParamError> {
    if !(params.sphere_radius > 0.0) || !params.sphere_radius.is_finite() {
        return Err(ParamError::NonPositiveRadius(params.sphere_radius));
    }
    if params.layers.is_empty() {
        return Err(ParamError::NoLayers);
    }
    for (i, layer) in params.layers.iter().enumerate() {
        validate_layer(i, layer)?;
        let extent = sample_extent(params.sphere_radius, layer);
        if !(extent <= MAX_SAMPLE_EXTENT) {
            return Err(ParamError::SampleDomainTooLarge { layer: i, extent });
        }
    }
    validate_output(&params.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NoiseLayer;

    fn params_with(layer: NoiseLayer) -> PlanetSurfaceParams {
        PlanetSurfaceParams {
            layers: vec![layer],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_params_are_valid() {
        assert_eq!(PlanetSurfaceParams::default().validate(), Ok(()));
        assert_eq!(PlanetSurfaceParams::earth_like(7).validate(), Ok(()));
        assert_eq!(PlanetSurfaceParams::moon_like(7).validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_frequency() {
        let mut layer = NoiseLayer::new(NoiseType::Perlin);
        layer.base.frequency = 0.0;
        assert_eq!(
            params_with(layer).validate(),
            Err(ParamError::NonPositiveFrequency { layer: 0, value: 0.0 })
        );
    }

    #[test]
    fn test_rejects_nan_frequency() {
        let mut layer = NoiseLayer::new(NoiseType::Perlin);
        layer.base.frequency = f32::NAN;
        assert!(matches!(
            params_with(layer).validate(),
            Err(ParamError::NonPositiveFrequency { layer: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_zero_octaves() {
        let mut layer = NoiseLayer::new(NoiseType::FbmPerlin);
        layer.fbm.octaves = 0;
        assert_eq!(
            params_with(layer).validate(),
            Err(ParamError::InvalidOctaveCount { layer: 0, value: 0 })
        );
    }

    #[test]
    fn test_rejects_too_many_octaves() {
        let layer = NoiseLayer::new(NoiseType::FbmPerlin).with_octaves(MAX_OCTAVES + 1);
        assert_eq!(
            params_with(layer).validate(),
            Err(ParamError::InvalidOctaveCount { layer: 0, value: MAX_OCTAVES + 1 })
        );

        let layer = NoiseLayer::new(NoiseType::RidgedFbmValue).with_octaves(u32::MAX);
        assert!(matches!(
            params_with(layer).validate(),
            Err(ParamError::InvalidOctaveCount { .. })
        ));

        let layer = NoiseLayer::new(NoiseType::FbmPerlin).with_octaves(MAX_OCTAVES);
        assert_eq!(params_with(layer).validate(), Ok(()));
    }

    #[test]
    fn test_rejects_overflowing_sample_domain() {
        let mut layer = NoiseLayer::new(NoiseType::Perlin);
        layer.base.frequency = 10.0;
        let params = PlanetSurfaceParams {
            sphere_radius: 1.0e38,
            ..params_with(layer)
        };
        assert!(matches!(
            params.validate(),
            Err(ParamError::SampleDomainTooLarge { layer: 0, .. })
        ));

        // Each octave multiplies the frequency, so a fractal layer overflows
        // where the same single-octave layer does not.
        let mut layer = NoiseLayer::new(NoiseType::FbmSimplex).with_octaves(MAX_OCTAVES);
        layer.base.frequency = 1.0e20;
        layer.fbm.lacunarity = 1.0e3;
        assert!(matches!(
            params_with(layer.clone()).validate(),
            Err(ParamError::SampleDomainTooLarge { .. })
        ));
        layer.noise_type = NoiseType::Simplex;
        assert_eq!(params_with(layer).validate(), Ok(()));
    }

    #[test]
    fn test_rejects_overflowing_curl_potential() {
        let mut layer = NoiseLayer::new(NoiseType::CurlIntensity);
        layer.curl.base_frequency = 1.0e36;
        assert!(matches!(
            params_with(layer).validate(),
            Err(ParamError::SampleDomainTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_gain_boundaries() {
        for gain in [0.0, 1.0, -0.5, 1.5] {
            let mut layer = NoiseLayer::new(NoiseType::FbmSimplex);
            layer.fbm.gain = gain;
            assert_eq!(
                params_with(layer).validate(),
                Err(ParamError::GainOutOfRange { layer: 0, value: gain }),
                "gain {} should be rejected",
                gain
            );
        }
    }

    #[test]
    fn test_accepts_gain_inside_range() {
        let mut layer = NoiseLayer::new(NoiseType::FbmSimplex);
        layer.fbm.gain = 0.999;
        assert_eq!(params_with(layer).validate(), Ok(()));
    }

    #[test]
    fn test_rejects_lacunarity_of_one() {
        let mut layer = NoiseLayer::new(NoiseType::FbmValue);
        layer.fbm.lacunarity = 1.0;
        assert!(matches!(
            params_with(layer).validate(),
            Err(ParamError::LacunarityTooSmall { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_jitter() {
        let mut layer = NoiseLayer::new(NoiseType::WorleyF2F1);
        layer.worley.jitter = 1.25;
        assert!(matches!(
            params_with(layer).validate(),
            Err(ParamError::JitterOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejects_recursive_curl() {
        let mut layer = NoiseLayer::new(NoiseType::CurlIntensity);
        layer.curl.base_noise_type = NoiseType::CurlIntensity;
        assert!(matches!(
            params_with(layer).validate(),
            Err(ParamError::InvalidCurlSettings { .. })
        ));
    }

    #[test]
    fn test_reports_failing_layer_index() {
        let mut bad = NoiseLayer::new(NoiseType::Perlin);
        bad.base.frequency = -1.0;
        let params = PlanetSurfaceParams {
            layers: vec![NoiseLayer::new(NoiseType::Perlin), bad],
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParamError::NonPositiveFrequency { layer: 1, value: -1.0 })
        );
    }

    #[test]
    fn test_rejects_empty_layers_and_bad_radius() {
        let mut params = PlanetSurfaceParams::default();
        params.layers.clear();
        assert_eq!(params.validate(), Err(ParamError::NoLayers));

        let params = PlanetSurfaceParams {
            sphere_radius: 0.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParamError::NonPositiveRadius(0.0)));
    }

    #[test]
    fn test_rejects_inverted_output_range() {
        let mut params = PlanetSurfaceParams::default();
        params.output.normalize_output_01 = true;
        params.output.expected_input_min = 1.0;
        params.output.expected_input_max = 1.0;
        assert!(matches!(
            params.validate(),
            Err(ParamError::InvalidOutputRange { .. })
        ));
    }
}
