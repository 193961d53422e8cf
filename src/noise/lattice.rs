//! Lattice primitives: Perlin, Simplex and Value noise in 3D.
//!
//! All three return values in [-1, 1].

use glam::Vec3;

use crate::params::Primitive;
use super::hash::{hash3, lattice, signed_f32};

/// Edge-midpoint gradients of a cube, padded to 16 so `hash & 15` indexes it.
const GRADIENTS: [[f32; 3]; 16] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, -1.0],
];

#[inline]
fn grad_dot(h: u32, x: f32, y: f32, z: f32) -> f32 {
    let g = GRADIENTS[(h & 15) as usize];
    g[0] * x + g[1] * y + g[2] * z
}

/// Quintic fade, C2-continuous at cell borders.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Samples the given primitive.
#[inline]
pub fn sample_primitive(primitive: Primitive, p: Vec3, seed: u32) -> f32 {
    match primitive {
        Primitive::Perlin => perlin3(p, seed),
        Primitive::Simplex => simplex3(p, seed),
        Primitive::Value => value3(p, seed),
    }
}

/// Classic gradient noise.
pub fn perlin3(p: Vec3, seed: u32) -> f32 {
    let (xi, xf) = lattice(p.x);
    let (yi, yf) = lattice(p.y);
    let (zi, zf) = lattice(p.z);
    let (u, v, w) = (fade(xf), fade(yf), fade(zf));

    let corner = |dx: i32, dy: i32, dz: i32| {
        let h = hash3(xi.wrapping_add(dx), yi.wrapping_add(dy), zi.wrapping_add(dz), seed);
        grad_dot(h, xf - dx as f32, yf - dy as f32, zf - dz as f32)
    };

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), u);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), u);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), u);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), u);

    lerp(lerp(x00, x10, v), lerp(x01, x11, v), w).clamp(-1.0, 1.0)
}

/// Simplex noise on the 3D tetrahedral lattice.
pub fn simplex3(p: Vec3, seed: u32) -> f32 {
    const F3: f32 = 1.0 / 3.0;
    const G3: f32 = 1.0 / 6.0;

    let skew = (p.x + p.y + p.z) * F3;
    let (i, _) = lattice(p.x + skew);
    let (j, _) = lattice(p.y + skew);
    let (k, _) = lattice(p.z + skew);

    // Unskewed cell origin, taken relative to the skewed floor so the
    // offsets stay small even when the absolute coordinates are large.
    let fi = (p.x + skew).floor();
    let fj = (p.y + skew).floor();
    let fk = (p.z + skew).floor();
    let unskew = (fi + fj + fk) * G3;
    let x0 = p.x - (fi - unskew);
    let y0 = p.y - (fj - unskew);
    let z0 = p.z - (fk - unskew);

    // Which of the six tetrahedra we are in.
    let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
        if y0 >= z0 {
            (1, 0, 0, 1, 1, 0)
        } else if x0 >= z0 {
            (1, 0, 0, 1, 0, 1)
        } else {
            (0, 0, 1, 1, 0, 1)
        }
    } else if y0 < z0 {
        (0, 0, 1, 0, 1, 1)
    } else if x0 < z0 {
        (0, 1, 0, 0, 1, 1)
    } else {
        (0, 1, 0, 1, 1, 0)
    };

    let corners = [
        (0, 0, 0, x0, y0, z0),
        (i1, j1, k1, x0 - i1 as f32 + G3, y0 - j1 as f32 + G3, z0 - k1 as f32 + G3),
        (i2, j2, k2, x0 - i2 as f32 + 2.0 * G3, y0 - j2 as f32 + 2.0 * G3, z0 - k2 as f32 + 2.0 * G3),
        (1, 1, 1, x0 - 1.0 + 3.0 * G3, y0 - 1.0 + 3.0 * G3, z0 - 1.0 + 3.0 * G3),
    ];

    let mut total = 0.0;
    for (di, dj, dk, x, y, z) in corners {
        let t = 0.6 - x * x - y * y - z * z;
        if t > 0.0 {
            let h = hash3(i.wrapping_add(di), j.wrapping_add(dj), k.wrapping_add(dk), seed);
            let t2 = t * t;
            total += t2 * t2 * grad_dot(h, x, y, z);
        }
    }

    (32.0 * total).clamp(-1.0, 1.0)
}

/// Interpolated random lattice values.
pub fn value3(p: Vec3, seed: u32) -> f32 {
    let (xi, xf) = lattice(p.x);
    let (yi, yf) = lattice(p.y);
    let (zi, zf) = lattice(p.z);
    let (u, v, w) = (fade(xf), fade(yf), fade(zf));

    let corner = |dx: i32, dy: i32, dz: i32| {
        signed_f32(hash3(xi.wrapping_add(dx), yi.wrapping_add(dy), zi.wrapping_add(dz), seed))
    };

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), u);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), u);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), u);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), u);

    lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const PRIMITIVES: [Primitive; 3] = [Primitive::Perlin, Primitive::Simplex, Primitive::Value];

    fn random_points(n: usize, scale: f32, seed: u64) -> Vec<Vec3> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n)
            .map(|_| {
                Vec3::new(
                    rng.random_range(-scale..scale),
                    rng.random_range(-scale..scale),
                    rng.random_range(-scale..scale),
                )
            })
            .collect()
    }

    #[test]
    fn test_primitives_in_range() {
        for primitive in PRIMITIVES {
            for p in random_points(2000, 50.0, 1) {
                let n = sample_primitive(primitive, p, 9);
                assert!(
                    (-1.0..=1.0).contains(&n),
                    "{:?} at {:?} gave {}",
                    primitive,
                    p,
                    n
                );
            }
        }
    }

    #[test]
    fn test_gradient_noise_vanishes_on_lattice() {
        for (x, y, z) in [(0.0, 0.0, 0.0), (3.0, -2.0, 7.0), (-11.0, 4.0, -1.0)] {
            assert_eq!(perlin3(Vec3::new(x, y, z), 5), 0.0);
        }
    }

    #[test]
    fn test_value_noise_hits_lattice_values() {
        let n = value3(Vec3::new(2.0, 3.0, 4.0), 5);
        assert_eq!(n, signed_f32(hash3(2, 3, 4, 5)));
    }

    #[test]
    fn test_primitives_are_not_constant() {
        for primitive in PRIMITIVES {
            let samples: Vec<f32> = random_points(200, 20.0, 2)
                .into_iter()
                .map(|p| sample_primitive(primitive, p, 3))
                .collect();
            let min = samples.iter().cloned().fold(f32::MAX, f32::min);
            let max = samples.iter().cloned().fold(f32::MIN, f32::max);
            assert!(max - min > 0.5, "{:?} spread only {}", primitive, max - min);
        }
    }

    #[test]
    fn test_seed_changes_output() {
        let p = Vec3::new(0.37, 1.21, -4.6);
        for primitive in PRIMITIVES {
            assert_ne!(
                sample_primitive(primitive, p, 1),
                sample_primitive(primitive, p, 2),
                "{:?} ignores its seed",
                primitive
            );
        }
    }

    #[test]
    fn test_continuity() {
        let p = Vec3::new(1.234, -5.678, 9.1011);
        let eps = Vec3::splat(1e-4);
        for primitive in PRIMITIVES {
            let a = sample_primitive(primitive, p, 4);
            let b = sample_primitive(primitive, p + eps, 4);
            assert!((a - b).abs() < 1e-2, "{:?} jumps from {} to {}", primitive, a, b);
        }
    }

    #[test]
    fn test_large_coordinates_stay_finite() {
        for primitive in PRIMITIVES {
            for p in [
                Vec3::splat(1.0e9),
                Vec3::splat(-1.0e9),
                Vec3::new(3.0e12, -3.0e12, 1.0),
            ] {
                let n = sample_primitive(primitive, p, 11);
                assert!(n.is_finite(), "{:?} at {:?} gave {}", primitive, p, n);
            }
        }
    }
}
