//! Parameter model for planet surface generation.
//!
//! Callers build a [`PlanetSurfaceParams`] per request; it is validated once
//! and resolved into [`NoiseLayerSettings`] before any sampling happens.

mod types;
mod surface;
mod validate;
pub mod gpu_layout;

pub use types::{
    BaseNoiseSettings, CurlSettings, DistanceMetric, FbmSettings, NoiseType,
    OutputProcessingSettings, Primitive, RidgedSettings, WorleySettings, MAX_OCTAVES,
};
pub use surface::{NoiseLayer, NoiseLayerSettings, PlanetSurfaceParams};
pub use validate::{ParamError, MAX_SAMPLE_EXTENT};
