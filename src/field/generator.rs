//! CPU field generation: pixels to projected coordinates to blended, processed samples.

use log::debug;
use rayon::prelude::*;
use thiserror::Error;

use crate::geometry::{CubeFaceId, Projection};
use crate::noise::evaluate;
use crate::params::{NoiseLayerSettings, OutputProcessingSettings, ParamError, PlanetSurfaceParams};
use super::grid::Grid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("invalid surface parameters: {0}")]
    InvalidParams(#[from] ParamError),
    #[error("invalid field dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("pixel ({x}, {y}) outside {width}x{height} field")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

/// Validated inputs shared by every pixel of one request.
struct Surface<'a> {
    projection: Projection,
    radius: f32,
    layers: Vec<NoiseLayerSettings>,
    output: &'a OutputProcessingSettings,
}

impl<'a> Surface<'a> {
    fn resolve(params: &'a PlanetSurfaceParams) -> Result<Self, FieldError> {
        Ok(Self {
            projection: params.projection,
            radius: params.sphere_radius,
            layers: params.resolve()?,
            output: &params.output,
        })
    }

    #[inline]
    fn shade(&self, x: u32, y: u32, width: u32, height: u32) -> f32 {
        let coord = self.projection.project_pixel(x, y, width, height) * self.radius;
        let sum: f32 = self
            .layers
            .iter()
            .map(|layer| layer.weight * evaluate(coord, layer))
            .sum();
        self.output.apply(sum)
    }

    fn fill(&self, grid: &mut Grid<f32>) {
        let width = grid.width();
        let height = grid.height();
        grid.as_mut_slice()
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, value) in row.iter_mut().enumerate() {
                    *value = self.shade(x as u32, y as u32, width, height);
                }
            });
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), FieldError> {
    if width == 0 || height == 0 {
        return Err(FieldError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Generates a `width × height` field.
///
/// Parameters are validated before any sampling. Rows are evaluated in
/// parallel; the result is identical to evaluating each pixel in order.
pub fn generate(
    width: u32,
    height: u32,
    params: &PlanetSurfaceParams,
) -> Result<Grid<f32>, FieldError> {
    check_dimensions(width, height)?;
    let mut grid = Grid::new(width, height);
    generate_into(&mut grid, params)?;
    Ok(grid)
}

/// Fills an existing grid, reusing its allocation.
pub fn generate_into(grid: &mut Grid<f32>, params: &PlanetSurfaceParams) -> Result<(), FieldError> {
    check_dimensions(grid.width(), grid.height())?;
    let surface = Surface::resolve(params)?;
    debug!(
        "generating {}x{} field, {} layer(s), {:?}",
        grid.width(),
        grid.height(),
        surface.layers.len(),
        surface.projection
    );
    surface.fill(grid);
    Ok(())
}

/// Generates all six cube-face fields at `resolution × resolution`.
///
/// `params.projection` is ignored; faces come back in [`CubeFaceId::all`] order.
pub fn generate_cube_faces(
    resolution: u32,
    params: &PlanetSurfaceParams,
) -> Result<[Grid<f32>; 6], FieldError> {
    check_dimensions(resolution, resolution)?;
    let mut surface = Surface::resolve(params)?;
    debug!("generating 6 cube faces at {}x{}", resolution, resolution);

    Ok(CubeFaceId::all().map(|face| {
        surface.projection = Projection::CubeFace(face);
        let mut grid = Grid::new(resolution, resolution);
        surface.fill(&mut grid);
        grid
    }))
}

/// Evaluates a single pixel of a `width × height` field.
pub fn sample_pixel(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    params: &PlanetSurfaceParams,
) -> Result<f32, FieldError> {
    check_dimensions(width, height)?;
    if x >= width || y >= height {
        return Err(FieldError::PixelOutOfBounds { x, y, width, height });
    }
    let surface = Surface::resolve(params)?;
    Ok(surface.shade(x, y, width, height))
}
