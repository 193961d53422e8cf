//! Planet surface parameters: the unit of work for one generation request.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Projection;
use super::types::{
    BaseNoiseSettings, CurlSettings, FbmSettings, NoiseType, OutputProcessingSettings,
    RidgedSettings, WorleySettings,
};
use super::validate::{validate_surface, ParamError};

/// One weighted noise layer as configured by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseLayer {
    pub noise_type: NoiseType,
    /// Contribution of this layer to the blended sum.
    pub weight: f32,
    /// Added to the surface seed so layers decorrelate.
    pub seed_offset: u32,
    pub base: BaseNoiseSettings,
    pub fbm: FbmSettings,
    pub worley: WorleySettings,
    pub ridged: RidgedSettings,
    pub curl: CurlSettings,
}

impl NoiseLayer {
    /// Creates a layer of the given type with default settings and weight 1.
    pub fn new(noise_type: NoiseType) -> Self {
        Self {
            noise_type,
            weight: 1.0,
            seed_offset: 0,
            base: BaseNoiseSettings::default(),
            fbm: FbmSettings::default(),
            worley: WorleySettings::default(),
            ridged: RidgedSettings::default(),
            curl: CurlSettings::default(),
        }
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.base.frequency = frequency;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.base.amplitude = amplitude;
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.base.offset = offset;
        self
    }

    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.fbm.octaves = octaves;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_seed_offset(mut self, seed_offset: u32) -> Self {
        self.seed_offset = seed_offset;
        self
    }

    /// Resolves this layer against the surface seed.
    ///
    /// Does not validate; use [`PlanetSurfaceParams::resolve`] for that.
    pub fn settings(&self, surface_seed: u32) -> NoiseLayerSettings {
        NoiseLayerSettings {
            noise_type: self.noise_type,
            seed: surface_seed.wrapping_add(self.seed_offset),
            weight: self.weight,
            base: self.base,
            fbm: self.fbm,
            worley: self.worley,
            ridged: self.ridged,
            curl: self.curl,
        }
    }
}

/// A layer ready for the noise evaluator: validated, with its final seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseLayerSettings {
    pub noise_type: NoiseType,
    pub seed: u32,
    /// Blend weight; read by the field generator, ignored by `evaluate`.
    pub weight: f32,
    pub base: BaseNoiseSettings,
    pub fbm: FbmSettings,
    pub worley: WorleySettings,
    pub ridged: RidgedSettings,
    pub curl: CurlSettings,
}

impl NoiseLayerSettings {
    /// Unvalidated single-layer settings, handy for sampling one noise type.
    pub fn new(noise_type: NoiseType, seed: u32) -> Self {
        NoiseLayer::new(noise_type).settings(seed)
    }
}

/// Everything needed to generate one planet texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetSurfaceParams {
    /// Master seed for every layer.
    pub random_seed: u32,
    /// Scales projected sample coordinates.
    pub sphere_radius: f32,
    /// How pixels map to 3D sample coordinates.
    pub projection: Projection,
    /// Blended in order; at least one is required.
    pub layers: Vec<NoiseLayer>,
    pub output: OutputProcessingSettings,
}

impl Default for PlanetSurfaceParams {
    fn default() -> Self {
        Self {
            random_seed: 42,
            sphere_radius: 1.0,
            projection: Projection::default(),
            layers: vec![NoiseLayer::new(NoiseType::FbmPerlin)],
            output: OutputProcessingSettings::default(),
        }
    }
}

impl PlanetSurfaceParams {
    /// Creates the default configuration with the given seed.
    pub fn with_seed(random_seed: u32) -> Self {
        Self {
            random_seed,
            ..Default::default()
        }
    }

    /// Continents from simplex fBm with ridged mountain belts on top.
    pub fn earth_like(random_seed: u32) -> Self {
        let mut continents = NoiseLayer::new(NoiseType::FbmSimplex)
            .with_frequency(1.5)
            .with_octaves(8);
        continents.fbm.lacunarity = 2.1;
        continents.fbm.gain = 0.55;

        let mountains = NoiseLayer::new(NoiseType::RidgedFbmPerlin)
            .with_frequency(3.0)
            .with_octaves(6)
            .with_weight(0.35)
            .with_seed_offset(999);

        Self {
            random_seed,
            sphere_radius: 1.0,
            projection: Projection::Equirectangular,
            layers: vec![continents, mountains],
            output: OutputProcessingSettings {
                expected_input_min: -1.0,
                expected_input_max: 1.35,
                ..OutputProcessingSettings::normalized_01()
            },
        }
    }

    /// Smooth value-noise highlands pocked by cellular craters.
    pub fn moon_like(random_seed: u32) -> Self {
        let mut highlands = NoiseLayer::new(NoiseType::FbmValue)
            .with_frequency(3.0)
            .with_octaves(4);
        highlands.fbm.gain = 0.4;

        let craters = NoiseLayer::new(NoiseType::WorleyF2F1)
            .with_frequency(6.0)
            .with_weight(-0.5)
            .with_seed_offset(31337);

        Self {
            random_seed,
            sphere_radius: 1.0,
            projection: Projection::Equirectangular,
            layers: vec![highlands, craters],
            output: OutputProcessingSettings::normalized_01(),
        }
    }

    /// Checks every invariant; nothing is generated from invalid parameters.
    pub fn validate(&self) -> Result<(), ParamError> {
        validate_surface(self)
    }

    /// Validates and resolves all layers into evaluator-ready settings.
    pub fn resolve(&self) -> Result<Vec<NoiseLayerSettings>, ParamError> {
        self.validate()?;
        Ok(self
            .layers
            .iter()
            .map(|layer| layer.settings(self.random_seed))
            .collect())
    }
}
