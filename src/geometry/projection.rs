//! Pixel-to-sample-coordinate projections.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::cube::CubeFaceId;

/// How a texture pixel maps to a 3D noise coordinate.
///
/// All projections produce points on (or, for `Planar`, within) the unit
/// domain; the field generator scales them by the sphere radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Longitude along x (-π..π), latitude along y (π/2 at the top row).
    /// Seamless across the date line since sampling happens on the sphere.
    #[default]
    Equirectangular,
    /// `(u, v, 0)`: a flat tile, for previews and non-planetary textures.
    Planar,
    /// One face of a spherified cube map.
    CubeFace(CubeFaceId),
}

impl Projection {
    /// Kernel code for `CubeFace`; the face travels separately.
    pub const CUBE_FACE_CODE: u32 = 2;

    /// Projection selector as understood by the compute kernel.
    pub const fn kernel_code(self) -> u32 {
        match self {
            Projection::Equirectangular => 0,
            Projection::Planar => 1,
            Projection::CubeFace(_) => Self::CUBE_FACE_CODE,
        }
    }

    /// Face index for `CubeFace`, 0 otherwise.
    pub const fn cube_face_index(self) -> u32 {
        match self {
            Projection::CubeFace(face) => face.index() as u32,
            _ => 0,
        }
    }

    /// Maps UV in [0, 1] to a unit-domain point.
    pub fn project_uv(self, u: f32, v: f32) -> Vec3 {
        match self {
            Projection::Equirectangular => {
                let lon = (u * 2.0 - 1.0) * PI;
                let lat = (0.5 - v) * PI;
                let (sin_lat, cos_lat) = lat.sin_cos();
                let (sin_lon, cos_lon) = lon.sin_cos();
                Vec3::new(cos_lat * cos_lon, sin_lat, cos_lat * sin_lon)
            }
            Projection::Planar => Vec3::new(u, v, 0.0),
            Projection::CubeFace(face) => face.sphere_point(u, v),
        }
    }

    /// Maps the center of pixel `(x, y)` in a `width × height` image.
    pub fn project_pixel(self, x: u32, y: u32, width: u32, height: u32) -> Vec3 {
        let (u, v) = pixel_center_uv(x, y, width, height);
        self.project_uv(u, v)
    }
}

/// UV of a pixel center, so edge pixels never sit exactly on the border.
#[inline]
pub fn pixel_center_uv(x: u32, y: u32, width: u32, height: u32) -> (f32, f32) {
    (
        (x as f32 + 0.5) / width as f32,
        (y as f32 + 0.5) / height as f32,
    )
}
