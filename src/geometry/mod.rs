//! Geometry for mapping texture pixels to 3D noise coordinates.
//!
//! Sampling in 3D lets spherical projections wrap seamlessly without the UV
//! seams a 2D noise would show.

mod cube;
mod projection;

pub use cube::{spherify, CubeFaceId};
pub use projection::{pixel_center_uv, Projection};
