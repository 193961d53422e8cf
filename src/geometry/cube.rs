//! Cube faces and the spherified cube-to-sphere mapping.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One face of the cube used by [`Projection::CubeFace`](super::Projection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CubeFaceId {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl CubeFaceId {
    pub const fn all() -> [CubeFaceId; 6] {
        [
            CubeFaceId::PosX,
            CubeFaceId::NegX,
            CubeFaceId::PosY,
            CubeFaceId::NegY,
            CubeFaceId::PosZ,
            CubeFaceId::NegZ,
        ]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<CubeFaceId> {
        match index {
            0 => Some(CubeFaceId::PosX),
            1 => Some(CubeFaceId::NegX),
            2 => Some(CubeFaceId::PosY),
            3 => Some(CubeFaceId::NegY),
            4 => Some(CubeFaceId::PosZ),
            5 => Some(CubeFaceId::NegZ),
            _ => None,
        }
    }

    /// Outward normal, then the directions of increasing u and v.
    ///
    /// The kernel carries the same table; keep them in sync.
    pub const fn basis(self) -> (Vec3, Vec3, Vec3) {
        match self {
            CubeFaceId::PosX => (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            CubeFaceId::NegX => (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            CubeFaceId::PosY => (Vec3::Y, Vec3::X, Vec3::Z),
            CubeFaceId::NegY => (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
            CubeFaceId::PosZ => (Vec3::Z, Vec3::X, Vec3::Y),
            CubeFaceId::NegZ => (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        }
    }

    /// Maps face UV in [0, 1] onto the surface of the [-1, 1] cube.
    pub fn cube_point(self, u: f32, v: f32) -> Vec3 {
        let (normal, right, up) = self.basis();
        normal + right * (u * 2.0 - 1.0) + up * (v * 2.0 - 1.0)
    }

    /// Maps face UV in [0, 1] onto the unit sphere.
    pub fn sphere_point(self, u: f32, v: f32) -> Vec3 {
        spherify(self.cube_point(u, v))
    }
}

/// Area-preserving-ish cube-to-sphere map; less corner crowding than `normalize`.
pub fn spherify(p: Vec3) -> Vec3 {
    let sq = p * p;
    Vec3::new(
        p.x * (1.0 - sq.y * 0.5 - sq.z * 0.5 + sq.y * sq.z / 3.0).max(0.0).sqrt(),
        p.y * (1.0 - sq.x * 0.5 - sq.z * 0.5 + sq.x * sq.z / 3.0).max(0.0).sqrt(),
        p.z * (1.0 - sq.x * 0.5 - sq.y * 0.5 + sq.x * sq.y / 3.0).max(0.0).sqrt(),
    )
}
