//! CPU noise evaluation.
//!
//! Every algorithm here is pure integer hashing plus f32 arithmetic, mirrored
//! line for line by the compute kernel in `dispatch/gpu/shaders`.

mod cellular;
mod curl;
mod evaluate;
mod fractal;
mod hash;
mod lattice;

pub use cellular::{nearest_two, worley_f2_f1};
pub use curl::{curl, curl_intensity, MIN_STEP, POTENTIAL_SEED_STRIDE};
pub use evaluate::evaluate;
pub use fractal::{fbm, ridged_fbm};
pub use hash::{hash3, octave_seed, OCTAVE_SEED_STRIDE};
pub use lattice::{perlin3, sample_primitive, simplex3, value3};
