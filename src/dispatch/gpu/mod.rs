//! wgpu compute implementation of the surface generator.

mod context;
mod pipeline;

pub use context::GpuContext;
pub use pipeline::{kernel_source, workgroup_count, PlanetTextureGenerator, WORKGROUP_SIZE};
