//! Curl of a noise-derived vector potential.

use glam::Vec3;

/// Seed spacing between the three potential components.
pub const POTENTIAL_SEED_STRIDE: u32 = 0x9e37_79b9;

/// Smallest finite-difference step; smaller steps drown in f32 rounding.
pub const MIN_STEP: f32 = 1e-6;

/// Curl vector of the potential `(ψx, ψy, ψz)` at `p`.
///
/// Each component is `potential(q, seed + k * POTENTIAL_SEED_STRIDE)` for
/// `k = 0, 1, 2`; partial derivatives use central differences with `step`.
pub fn curl<F>(p: Vec3, seed: u32, step: f32, potential: F) -> Vec3
where
    F: Fn(Vec3, u32) -> f32,
{
    let h = step.max(MIN_STEP);
    let seeds = [
        seed,
        seed.wrapping_add(POTENTIAL_SEED_STRIDE),
        seed.wrapping_add(POTENTIAL_SEED_STRIDE.wrapping_mul(2)),
    ];

    // d(component)/d(axis)
    let partial = |component: usize, axis: Vec3| {
        let s = seeds[component];
        (potential(p + axis * h, s) - potential(p - axis * h, s)) / (2.0 * h)
    };

    Vec3::new(
        partial(2, Vec3::Y) - partial(1, Vec3::Z),
        partial(0, Vec3::Z) - partial(2, Vec3::X),
        partial(1, Vec3::X) - partial(0, Vec3::Y),
    )
}

/// Magnitude of [`curl`].
pub fn curl_intensity<F>(p: Vec3, seed: u32, step: f32, potential: F) -> f32
where
    F: Fn(Vec3, u32) -> f32,
{
    curl(p, seed, step, potential).length()
}
