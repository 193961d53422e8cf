//! Procedural planet surface textures from layered 3D noise.
//!
//! A [`PlanetSurfaceParams`] describes a stack of weighted noise layers
//! (Perlin, Simplex, Value, Worley, fBm, ridged fBm, curl intensity) plus
//! output processing. It renders into a row-major [`Grid`] on the CPU with
//! rayon, or into an R32Float texture with a wgpu compute kernel that shares
//! its parameter layout with the host.

pub mod dispatch;
pub mod field;
pub mod geometry;
pub mod noise;
pub mod params;

pub use dispatch::{generate_with_backend, Backend, DispatchError, GpuContext, PlanetTextureGenerator};
pub use field::{generate, generate_cube_faces, generate_into, sample_pixel, FieldError, Grid};
pub use geometry::{CubeFaceId, Projection};
pub use noise::evaluate;
pub use params::{
    NoiseLayer, NoiseLayerSettings, NoiseType, OutputProcessingSettings, ParamError,
    PlanetSurfaceParams,
};
