//! Seed-stable lattice hashing shared by every primitive.
//!
//! Integer-only, so the compute kernel reproduces it exactly.

/// Splits a coordinate into its lattice cell and the offset inside it.
///
/// The float-to-int cast saturates, and callers step to neighbor cells with
/// `wrapping_add`, so huge coordinates never overflow.
#[inline]
pub fn lattice(x: f32) -> (i32, f32) {
    let cell = x.floor();
    (cell as i32, x - cell)
}

/// Avalanche mix (lowbias32).
#[inline]
pub fn mix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Hashes an integer lattice point together with a seed.
#[inline]
pub fn hash3(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let mut h = mix(seed.wrapping_mul(0x27d4_eb2d));
    h = mix(h ^ (x as u32).wrapping_mul(0x8da6_b343));
    h = mix(h ^ (y as u32).wrapping_mul(0xd816_3841));
    mix(h ^ (z as u32).wrapping_mul(0xcb1a_b31f))
}

/// Top 24 bits as a float in [0, 1).
#[inline]
pub fn unit_f32(h: u32) -> f32 {
    (h >> 8) as f32 * (1.0 / 16_777_216.0)
}

/// Top 24 bits as a float in [-1, 1).
#[inline]
pub fn signed_f32(h: u32) -> f32 {
    unit_f32(h) * 2.0 - 1.0
}

/// Seed spacing between fractal octaves.
pub const OCTAVE_SEED_STRIDE: u32 = 31337;

/// Seed for octave `i`; octave 0 keeps the layer seed.
#[inline]
pub fn octave_seed(seed: u32, octave: u32) -> u32 {
    seed.wrapping_add(octave.wrapping_mul(OCTAVE_SEED_STRIDE))
}
