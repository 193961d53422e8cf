//! Backend selection with CPU fallback.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::field::{self, FieldError, Grid};
use crate::params::PlanetSurfaceParams;
use super::gpu::{GpuContext, PlanetTextureGenerator};
use super::DispatchError;

/// Which implementation renders the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Backend {
    /// Prefer GPU; if it cannot be used, fall back to CPU.
    #[default]
    Auto,
    /// Require GPU (fail if unavailable).
    GpuOnly,
    /// Force the CPU implementation.
    CpuOnly,
}

fn run_gpu(width: u32, height: u32, params: &PlanetSurfaceParams) -> Result<Grid<f32>, DispatchError> {
    let ctx = GpuContext::new_blocking()?;
    PlanetTextureGenerator::new(ctx)?.generate(width, height, params)
}

/// Generates a `width × height` field on the chosen backend.
///
/// Parameters and dimensions are checked up front, so bad input fails the
/// same way on every backend and never triggers a fallback.
pub fn generate_with_backend(
    width: u32,
    height: u32,
    params: &PlanetSurfaceParams,
    backend: Backend,
) -> Result<Grid<f32>, DispatchError> {
    params.validate()?;
    if width == 0 || height == 0 {
        return Err(FieldError::InvalidDimensions { width, height }.into());
    }

    debug!("generating {}x{} field on {:?} backend", width, height, backend);
    match backend {
        Backend::CpuOnly => Ok(field::generate(width, height, params)?),
        Backend::GpuOnly => run_gpu(width, height, params),
        Backend::Auto => match run_gpu(width, height, params) {
            Ok(grid) => Ok(grid),
            Err(e) => {
                warn!("GPU generation failed ({}), falling back to CPU", e);
                Ok(field::generate(width, height, params)?)
            }
        },
    }
}
