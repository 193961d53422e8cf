//! Field generation on the CPU.

mod generator;
mod grid;

pub use generator::{generate, generate_cube_faces, generate_into, sample_pixel, FieldError};
pub use grid::Grid;
