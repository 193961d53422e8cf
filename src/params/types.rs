//! Noise layer settings.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Selects the evaluation algorithm for a noise layer.
///
/// Discriminants are part of the kernel ABI and must stay in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum NoiseType {
    Perlin = 0,
    Simplex = 1,
    Value = 2,
    /// Cellular noise, distance to second-nearest minus nearest feature point.
    WorleyF2F1 = 3,
    FbmPerlin = 4,
    FbmSimplex = 5,
    FbmValue = 6,
    RidgedFbmPerlin = 7,
    RidgedFbmSimplex = 8,
    RidgedFbmValue = 9,
    /// Magnitude of a divergence-free curl field built from a base noise.
    CurlIntensity = 10,
}

impl NoiseType {
    /// Returns all noise types in discriminant order.
    pub const fn all() -> [NoiseType; 11] {
        [
            NoiseType::Perlin,
            NoiseType::Simplex,
            NoiseType::Value,
            NoiseType::WorleyF2F1,
            NoiseType::FbmPerlin,
            NoiseType::FbmSimplex,
            NoiseType::FbmValue,
            NoiseType::RidgedFbmPerlin,
            NoiseType::RidgedFbmSimplex,
            NoiseType::RidgedFbmValue,
            NoiseType::CurlIntensity,
        ]
    }

    /// Creates a noise type from its discriminant.
    pub const fn from_index(index: u16) -> Option<NoiseType> {
        match index {
            0 => Some(NoiseType::Perlin),
            1 => Some(NoiseType::Simplex),
            2 => Some(NoiseType::Value),
            3 => Some(NoiseType::WorleyF2F1),
            4 => Some(NoiseType::FbmPerlin),
            5 => Some(NoiseType::FbmSimplex),
            6 => Some(NoiseType::FbmValue),
            7 => Some(NoiseType::RidgedFbmPerlin),
            8 => Some(NoiseType::RidgedFbmSimplex),
            9 => Some(NoiseType::RidgedFbmValue),
            10 => Some(NoiseType::CurlIntensity),
            _ => None,
        }
    }

    /// Returns the discriminant as used by the compute kernel.
    pub const fn index(self) -> u32 {
        self as u16 as u32
    }

    /// Returns the lattice noise that fractal variants are built from.
    ///
    /// Worley and curl have no lattice primitive and return `None`.
    pub const fn primitive(self) -> Option<Primitive> {
        match self {
            NoiseType::Perlin | NoiseType::FbmPerlin | NoiseType::RidgedFbmPerlin => {
                Some(Primitive::Perlin)
            }
            NoiseType::Simplex | NoiseType::FbmSimplex | NoiseType::RidgedFbmSimplex => {
                Some(Primitive::Simplex)
            }
            NoiseType::Value | NoiseType::FbmValue | NoiseType::RidgedFbmValue => {
                Some(Primitive::Value)
            }
            NoiseType::WorleyF2F1 | NoiseType::CurlIntensity => None,
        }
    }

    /// Returns true for the plain fBm variants.
    pub const fn is_fbm(self) -> bool {
        matches!(
            self,
            NoiseType::FbmPerlin | NoiseType::FbmSimplex | NoiseType::FbmValue
        )
    }

    /// Returns true for the ridged fBm variants.
    pub const fn is_ridged(self) -> bool {
        matches!(
            self,
            NoiseType::RidgedFbmPerlin | NoiseType::RidgedFbmSimplex | NoiseType::RidgedFbmValue
        )
    }

    /// Returns true for any variant that sums octaves.
    pub const fn is_fractal(self) -> bool {
        self.is_fbm() || self.is_ridged()
    }
}

/// Lattice noise primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Perlin,
    Simplex,
    Value,
}

/// Domain transform applied before any primitive is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseNoiseSettings {
    /// Coordinate scale; must be positive.
    pub frequency: f32,
    /// Output scale.
    pub amplitude: f32,
    /// Domain translation added after scaling.
    pub offset: Vec3,
}

impl Default for BaseNoiseSettings {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            amplitude: 1.0,
            offset: Vec3::ZERO,
        }
    }
}

impl BaseNoiseSettings {
    /// Maps an input coordinate into noise space.
    #[inline]
    pub fn sample_point(&self, coord: Vec3) -> Vec3 {
        coord * self.frequency + self.offset
    }
}

/// Upper bound on [`FbmSettings::octaves`].
pub const MAX_OCTAVES: u32 = 16;

/// Fractal summation controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FbmSettings {
    /// Number of octaves, in `1..=MAX_OCTAVES`.
    pub octaves: u32,
    /// Frequency multiplier per octave; must exceed 1.
    pub lacunarity: f32,
    /// Amplitude multiplier per octave, exclusive range (0, 1).
    pub gain: f32,
    /// Divide the sum by the total octave amplitude.
    pub normalize: bool,
}

impl Default for FbmSettings {
    fn default() -> Self {
        Self {
            octaves: 6,
            lacunarity: 2.0,
            gain: 0.5,
            normalize: true,
        }
    }
}

/// Distance function used by Worley noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum DistanceMetric {
    #[default]
    Euclidean = 0,
    EuclideanSquared = 1,
    Manhattan = 2,
    Chebyshev = 3,
}

impl DistanceMetric {
    /// Returns all metrics in discriminant order.
    pub const fn all() -> [DistanceMetric; 4] {
        [
            DistanceMetric::Euclidean,
            DistanceMetric::EuclideanSquared,
            DistanceMetric::Manhattan,
            DistanceMetric::Chebyshev,
        ]
    }

    /// Distance between two points under this metric.
    #[inline]
    pub fn distance(self, a: Vec3, b: Vec3) -> f32 {
        let d = a - b;
        match self {
            DistanceMetric::Euclidean => d.length(),
            DistanceMetric::EuclideanSquared => d.length_squared(),
            DistanceMetric::Manhattan => d.x.abs() + d.y.abs() + d.z.abs(),
            DistanceMetric::Chebyshev => d.abs().max_element(),
        }
    }
}

/// Cellular noise controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorleySettings {
    /// How far feature points may stray from their cell center, in [0, 1].
    pub jitter: f32,
    /// Added to the layer seed when hashing feature points.
    pub seed_offset: u32,
    pub metric: DistanceMetric,
}

impl Default for WorleySettings {
    fn default() -> Self {
        Self {
            jitter: 1.0,
            seed_offset: 0,
            metric: DistanceMetric::Euclidean,
        }
    }
}

/// Ridge shaping for the ridged fBm variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RidgedSettings {
    /// Sharpness applied to each inverted octave (2.0 squares it).
    pub exponent: f32,
    /// Value the absolute sample is subtracted from; at least 1.
    pub offset: f32,
    /// Feedback from one octave's ridge into the next octave's weight.
    pub weight: f32,
}

impl Default for RidgedSettings {
    fn default() -> Self {
        Self {
            exponent: 2.0,
            offset: 1.0,
            weight: 2.0,
        }
    }
}

/// Curl-noise potential settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurlSettings {
    /// Noise used for the vector potential; anything but `CurlIntensity`.
    pub base_noise_type: NoiseType,
    pub base_frequency: f32,
    pub base_amplitude: f32,
    pub seed_offset: u32,
    /// Central-difference step in noise space.
    pub step_size: f32,
}

impl Default for CurlSettings {
    fn default() -> Self {
        Self {
            base_noise_type: NoiseType::Simplex,
            base_frequency: 1.0,
            base_amplitude: 1.0,
            seed_offset: 0,
            step_size: 1e-2,
        }
    }
}

/// Post-processing applied to the blended layer sum.
///
/// Order: `baseline` is added, then optional normalization of
/// `[expected_input_min, expected_input_max]` to `[0, 1]`, then optional clamp,
/// then a sign-preserving power curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputProcessingSettings {
    /// Constant added to the weighted layer sum.
    pub baseline: f32,
    pub normalize_output_01: bool,
    pub expected_input_min: f32,
    pub expected_input_max: f32,
    /// Clamp to `[0, 1]` when normalizing, otherwise to the expected input range.
    pub clamp_output: bool,
    /// Curve exponent; 1.0 leaves values untouched.
    pub exponent: f32,
}

impl Default for OutputProcessingSettings {
    fn default() -> Self {
        Self {
            baseline: 0.0,
            normalize_output_01: false,
            expected_input_min: -1.0,
            expected_input_max: 1.0,
            clamp_output: false,
            exponent: 1.0,
        }
    }
}

impl OutputProcessingSettings {
    /// Normalizes the expected `[-1, 1]` range to `[0, 1]` and clamps.
    pub fn normalized_01() -> Self {
        Self {
            normalize_output_01: true,
            clamp_output: true,
            ..Default::default()
        }
    }

    /// Applies the processing chain to a blended value.
    pub fn apply(&self, value: f32) -> f32 {
        let mut v = value + self.baseline;

        if self.normalize_output_01 {
            let range = self.expected_input_max - self.expected_input_min;
            v = (v - self.expected_input_min) / range;
            if self.clamp_output {
                v = v.clamp(0.0, 1.0);
            }
        } else if self.clamp_output {
            v = v.clamp(self.expected_input_min, self.expected_input_max);
        }

        if self.exponent != 1.0 {
            v = v.signum() * v.abs().powf(self.exponent);
        }

        v
    }
}
