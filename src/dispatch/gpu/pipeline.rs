//! Compute pipeline that renders a planet surface into an R32Float texture.

use std::borrow::Cow;
use std::num::NonZeroU64;

use log::debug;

use crate::field::Grid;
use crate::noise::{MIN_STEP, OCTAVE_SEED_STRIDE, POTENTIAL_SEED_STRIDE};
use crate::params::gpu_layout::{wgsl_prelude, GpuNoiseLayer, GpuSurfaceHeader};
use crate::params::PlanetSurfaceParams;
use crate::dispatch::DispatchError;
use super::context::GpuContext;

/// Edge length of the square workgroup declared by the kernel.
pub const WORKGROUP_SIZE: u32 = 8;

const ENTRY_POINT: &str = "generate_planet_texture";
const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;

fn align_to(value: u32, alignment: u32) -> u32 {
    debug_assert!(alignment.is_power_of_two());
    (value + alignment - 1) & !(alignment - 1)
}

/// Workgroups needed to cover `width × height` pixels.
pub fn workgroup_count(width: u32, height: u32) -> (u32, u32) {
    (
        width.div_ceil(WORKGROUP_SIZE),
        height.div_ceil(WORKGROUP_SIZE),
    )
}

/// Full kernel source: generated prelude, seed constants, then the kernel body.
pub fn kernel_source() -> String {
    format!(
        "{}\n\
         const OCTAVE_SEED_STRIDE: u32 = {}u;\n\
         const POTENTIAL_SEED_STRIDE: u32 = {}u;\n\
         const MIN_STEP: f32 = {:e};\n\n{}",
        wgsl_prelude(),
        OCTAVE_SEED_STRIDE,
        POTENTIAL_SEED_STRIDE,
        MIN_STEP,
        include_str!("shaders/planet_noise.wgsl"),
    )
}

/// Turns row-padded readback bytes into tightly packed samples.
fn unpack_rows_padded(width: u32, height: u32, padded_bpr: u32, bytes: &[u8]) -> Vec<f32> {
    let row_bytes = width as usize * 4;
    let mut out = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as usize {
        let start = y * padded_bpr as usize;
        out.extend(
            bytes[start..start + row_bytes]
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        );
    }
    out
}

/// Owns the compiled kernel and renders surfaces on one [`GpuContext`].
pub struct PlanetTextureGenerator {
    ctx: GpuContext,
    bgl: wgpu::BindGroupLayout,
    pipeline: wgpu::ComputePipeline,
}

impl PlanetTextureGenerator {
    /// Compiles the kernel; fails if the device rejects the shader or pipeline.
    pub fn new(ctx: GpuContext) -> Result<Self, DispatchError> {
        ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("noise-planet-wgsl"),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(kernel_source())),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("noise-planet-bgl"),
            entries: &[
                // Header
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(std::mem::size_of::<GpuSurfaceHeader>() as u64),
                    },
                    count: None,
                },
                // Layers
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(std::mem::size_of::<GpuNoiseLayer>() as u64),
                    },
                    count: None,
                },
                // Output
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: OUTPUT_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("noise-planet-pipeline-layout"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });

        let pipeline = ctx.device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(ENTRY_POINT),
            layout: Some(&pipeline_layout),
            module: &module,
            entry_point: Some(ENTRY_POINT),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        if let Some(e) = pollster::block_on(ctx.device.pop_error_scope()) {
            return Err(DispatchError::Pipeline(e.to_string()));
        }

        Ok(Self { ctx, bgl, pipeline })
    }

    fn check_dimensions(&self, width: u32, height: u32) -> Result<(), DispatchError> {
        let max = self.ctx.max_texture_dimension();
        if width == 0 || height == 0 || width > max || height > max {
            return Err(DispatchError::InvalidDimensions { width, height, max });
        }
        Ok(())
    }

    /// Renders the surface into a new `width × height` R32Float texture.
    ///
    /// The work is submitted but not awaited; the texture is usable by any
    /// later submission on the same queue.
    pub fn generate_texture(
        &self,
        width: u32,
        height: u32,
        params: &PlanetSurfaceParams,
    ) -> Result<wgpu::Texture, DispatchError> {
        self.check_dimensions(width, height)?;
        let layers: Vec<GpuNoiseLayer> = params.resolve()?.iter().map(GpuNoiseLayer::from).collect();
        let header = GpuSurfaceHeader::new(width, height, params);

        self.ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let header_buf = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("noise-planet-header"),
            size: std::mem::size_of::<GpuSurfaceHeader>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.ctx.queue.write_buffer(&header_buf, 0, bytemuck::bytes_of(&header));

        let layer_bytes: &[u8] = bytemuck::cast_slice(&layers);
        let layer_buf = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("noise-planet-layers"),
            size: layer_bytes.len() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.ctx.queue.write_buffer(&layer_buf, 0, layer_bytes);

        let texture = self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("noise-planet-surface"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OUTPUT_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("noise-planet-bind-group"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: header_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: layer_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
            ],
        });

        let (gx, gy) = workgroup_count(width, height);
        debug!(
            "dispatching {}x{} workgroups for a {}x{} surface, {} layer(s)",
            gx,
            gy,
            width,
            height,
            layers.len()
        );

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("noise-planet-encoder"),
        });
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("noise-planet-pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.pipeline);
            cpass.set_bind_group(0, &bind_group, &[]);
            cpass.dispatch_workgroups(gx, gy, 1);
        }
        self.ctx.queue.submit(Some(encoder.finish()));

        if let Some(e) = pollster::block_on(self.ctx.device.pop_error_scope()) {
            return Err(DispatchError::Pipeline(e.to_string()));
        }
        Ok(texture)
    }

    /// Renders the surface and reads it back into a [`Grid`].
    pub fn generate(
        &self,
        width: u32,
        height: u32,
        params: &PlanetSurfaceParams,
    ) -> Result<Grid<f32>, DispatchError> {
        let texture = self.generate_texture(width, height, params)?;
        let data = self.readback(&texture, width, height)?;
        Grid::from_vec(width, height, data)
            .ok_or_else(|| DispatchError::Readback("readback size mismatch".to_string()))
    }

    fn readback(&self, texture: &wgpu::Texture, width: u32, height: u32) -> Result<Vec<f32>, DispatchError> {
        // bytes_per_row must be a multiple of 256 for texture-to-buffer copies.
        let padded_bpr = align_to(width * 4, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let size = padded_bpr as u64 * height as u64;

        let readback = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("noise-planet-readback-buffer"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("noise-planet-readback-encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bpr),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.ctx.queue.submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        // Block until the mapping is ready.
        self.ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|e| DispatchError::Readback(e.to_string()))?
            .map_err(|e| DispatchError::Readback(e.to_string()))?;

        let data = slice.get_mapped_range();
        let out = unpack_rows_padded(width, height, padded_bpr, &data);
        drop(data);
        readback.unmap();
        Ok(out)
    }
}
