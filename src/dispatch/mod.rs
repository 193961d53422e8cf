//! Backend selection and GPU dispatch.

mod backend;
pub mod gpu;

use thiserror::Error;

use crate::field::FieldError;
use crate::params::ParamError;

pub use backend::{generate_with_backend, Backend};
pub use gpu::{GpuContext, PlanetTextureGenerator};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Adapter {0} cannot run compute shaders")]
    ComputeUnsupported(String),
    #[error("Failed to request device: {0}")]
    RequestDevice(String),
    #[error("invalid surface parameters: {0}")]
    InvalidParams(#[from] ParamError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("invalid texture dimensions {width}x{height} (device maximum {max})")]
    InvalidDimensions { width: u32, height: u32, max: u32 },
    #[error("GPU validation failed: {0}")]
    Pipeline(String),
    #[error("Failed to read back surface texture: {0}")]
    Readback(String),
}
