//! Kernel ABI for the compute dispatcher.
//!
//! Each struct here is declared once through `kernel_struct!`, which emits
//! both the `#[repr(C)]` Rust type and its WGSL twin, and the enum constants
//! are generated from the Rust enums. The kernel source is prefixed with
//! [`wgsl_prelude`], so host and kernel can't drift apart.
//!
//! Only `u32`, `f32` and `vec4<f32>` (as `[f32; 4]`) are used, with every
//! vector on a 16-byte boundary, so the uniform/storage layout rules of WGSL
//! and `repr(C)` agree without hidden padding.

use bytemuck::{Pod, Zeroable};

use crate::geometry::Projection;
use super::surface::{NoiseLayerSettings, PlanetSurfaceParams};
use super::types::{DistanceMetric, NoiseType};

macro_rules! kernel_struct {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* pub $field:ident : $rty:ty => $wty:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $rty, )*
        }

        impl $name {
            /// WGSL declaration with identical field order and types.
            pub const WGSL: &'static str = concat!(
                "struct ", stringify!($name), " {\n",
                $( "    ", stringify!($field), ": ", $wty, ",\n", )*
                "}\n"
            );
        }
    };
}

kernel_struct! {
    /// Per-request constants, bound as a uniform.
    pub struct GpuSurfaceHeader {
        pub width: u32 => "u32",
        pub height: u32 => "u32",
        pub layer_count: u32 => "u32",
        pub projection: u32 => "u32",
        pub cube_face: u32 => "u32",
        pub normalize_output_01: u32 => "u32",
        pub clamp_output: u32 => "u32",
        pub _pad0: u32 => "u32",
        /// x: sphere radius, y: baseline, z: expected min, w: expected max.
        pub p0: [f32; 4] => "vec4<f32>",
        /// x: output exponent.
        pub p1: [f32; 4] => "vec4<f32>",
    }
}

kernel_struct! {
    /// One resolved noise layer, bound as an element of a storage array.
    pub struct GpuNoiseLayer {
        pub noise_type: u32 => "u32",
        pub seed: u32 => "u32",
        pub octaves: u32 => "u32",
        pub fbm_normalize: u32 => "u32",
        pub worley_metric: u32 => "u32",
        pub worley_seed: u32 => "u32",
        pub curl_base_type: u32 => "u32",
        pub curl_seed: u32 => "u32",
        /// x: frequency, y: amplitude, z: weight.
        pub base: [f32; 4] => "vec4<f32>",
        /// xyz: domain offset.
        pub offset: [f32; 4] => "vec4<f32>",
        /// x: lacunarity, y: gain, z: Worley jitter.
        pub fbm: [f32; 4] => "vec4<f32>",
        /// x: exponent, y: offset, z: weight.
        pub ridged: [f32; 4] => "vec4<f32>",
        /// x: base frequency, y: base amplitude, z: step size.
        pub curl: [f32; 4] => "vec4<f32>",
    }
}

impl GpuSurfaceHeader {
    pub fn new(width: u32, height: u32, params: &PlanetSurfaceParams) -> Self {
        let out = &params.output;
        Self {
            width,
            height,
            layer_count: params.layers.len() as u32,
            projection: params.projection.kernel_code(),
            cube_face: params.projection.cube_face_index(),
            normalize_output_01: out.normalize_output_01 as u32,
            clamp_output: out.clamp_output as u32,
            _pad0: 0,
            p0: [
                params.sphere_radius,
                out.baseline,
                out.expected_input_min,
                out.expected_input_max,
            ],
            p1: [out.exponent, 0.0, 0.0, 0.0],
        }
    }
}

impl From<&NoiseLayerSettings> for GpuNoiseLayer {
    fn from(s: &NoiseLayerSettings) -> Self {
        Self {
            noise_type: s.noise_type.index(),
            seed: s.seed,
            octaves: s.fbm.octaves,
            fbm_normalize: s.fbm.normalize as u32,
            worley_metric: s.worley.metric as u32,
            worley_seed: s.seed.wrapping_add(s.worley.seed_offset),
            curl_base_type: s.curl.base_noise_type.index(),
            curl_seed: s.seed.wrapping_add(s.curl.seed_offset),
            base: [s.base.frequency, s.base.amplitude, s.weight, 0.0],
            offset: s.base.offset.extend(0.0).to_array(),
            fbm: [s.fbm.lacunarity, s.fbm.gain, s.worley.jitter, 0.0],
            ridged: [s.ridged.exponent, s.ridged.offset, s.ridged.weight, 0.0],
            curl: [s.curl.base_frequency, s.curl.base_amplitude, s.curl.step_size, 0.0],
        }
    }
}

fn noise_const_name(t: NoiseType) -> &'static str {
    match t {
        NoiseType::Perlin => "NOISE_PERLIN",
        NoiseType::Simplex => "NOISE_SIMPLEX",
        NoiseType::Value => "NOISE_VALUE",
        NoiseType::WorleyF2F1 => "NOISE_WORLEY_F2F1",
        NoiseType::FbmPerlin => "NOISE_FBM_PERLIN",
        NoiseType::FbmSimplex => "NOISE_FBM_SIMPLEX",
        NoiseType::FbmValue => "NOISE_FBM_VALUE",
        NoiseType::RidgedFbmPerlin => "NOISE_RIDGED_FBM_PERLIN",
        NoiseType::RidgedFbmSimplex => "NOISE_RIDGED_FBM_SIMPLEX",
        NoiseType::RidgedFbmValue => "NOISE_RIDGED_FBM_VALUE",
        NoiseType::CurlIntensity => "NOISE_CURL_INTENSITY",
    }
}

fn metric_const_name(m: DistanceMetric) -> &'static str {
    match m {
        DistanceMetric::Euclidean => "METRIC_EUCLIDEAN",
        DistanceMetric::EuclideanSquared => "METRIC_EUCLIDEAN_SQUARED",
        DistanceMetric::Manhattan => "METRIC_MANHATTAN",
        DistanceMetric::Chebyshev => "METRIC_CHEBYSHEV",
    }
}

fn u32_const(name: &str, value: u32) -> String {
    format!("const {}: u32 = {}u;\n", name, value)
}

/// Generated WGSL: enum constants followed by the struct declarations.
pub fn wgsl_prelude() -> String {
    let noise = NoiseType::all().map(|t| u32_const(noise_const_name(t), t.index()));
    let metrics = DistanceMetric::all().map(|m| u32_const(metric_const_name(m), m as u32));
    let projections = [
        u32_const("PROJECTION_EQUIRECTANGULAR", Projection::Equirectangular.kernel_code()),
        u32_const("PROJECTION_PLANAR", Projection::Planar.kernel_code()),
        u32_const("PROJECTION_CUBE_FACE", Projection::CUBE_FACE_CODE),
    ];

    let mut src: String = noise
        .iter()
        .chain(&metrics)
        .chain(&projections)
        .map(String::as_str)
        .collect();
    src.push('\n');
    src.push_str(GpuSurfaceHeader::WGSL);
    src.push('\n');
    src.push_str(GpuNoiseLayer::WGSL);
    src
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};
    use crate::geometry::CubeFaceId;
    use crate::params::NoiseLayer;

    #[test]
    fn test_header_layout() {
        assert_eq!(size_of::<GpuSurfaceHeader>(), 64);
        assert_eq!(offset_of!(GpuSurfaceHeader, p0), 32);
        assert_eq!(offset_of!(GpuSurfaceHeader, p1), 48);
    }

    #[test]
    fn test_layer_layout() {
        assert_eq!(size_of::<GpuNoiseLayer>(), 112);
        assert_eq!(size_of::<GpuNoiseLayer>() % 16, 0, "array stride must be 16-aligned");
        assert_eq!(offset_of!(GpuNoiseLayer, base), 32);
        assert_eq!(offset_of!(GpuNoiseLayer, offset), 48);
        assert_eq!(offset_of!(GpuNoiseLayer, fbm), 64);
        assert_eq!(offset_of!(GpuNoiseLayer, ridged), 80);
        assert_eq!(offset_of!(GpuNoiseLayer, curl), 96);
    }

    #[test]
    fn test_wgsl_mirrors_rust_fields() {
        assert!(GpuSurfaceHeader::WGSL.starts_with("struct GpuSurfaceHeader {\n"));
        assert!(GpuSurfaceHeader::WGSL.contains("    layer_count: u32,\n"));
        assert!(GpuSurfaceHeader::WGSL.contains("    p1: vec4<f32>,\n"));
        assert!(GpuNoiseLayer::WGSL.contains("    curl_seed: u32,\n    base: vec4<f32>,\n"));
    }

    #[test]
    fn test_prelude_constants() {
        let src = wgsl_prelude();
        assert!(src.contains("const NOISE_PERLIN: u32 = 0u;"));
        assert!(src.contains("const NOISE_CURL_INTENSITY: u32 = 10u;"));
        assert!(src.contains("const METRIC_CHEBYSHEV: u32 = 3u;"));
        assert!(src.contains("const PROJECTION_PLANAR: u32 = 1u;\nconst PROJECTION_CUBE_FACE: u32 = 2u;\n"));
        assert!(src.contains("struct GpuNoiseLayer {"));
    }

    #[test]
    fn test_header_from_params() {
        let params = PlanetSurfaceParams {
            sphere_radius: 2.5,
            projection: Projection::CubeFace(CubeFaceId::NegY),
            ..PlanetSurfaceParams::earth_like(3)
        };
        let header = GpuSurfaceHeader::new(64, 32, &params);
        assert_eq!(header.width, 64);
        assert_eq!(header.height, 32);
        assert_eq!(header.layer_count, 2);
        assert_eq!(header.projection, Projection::CUBE_FACE_CODE);
        assert_eq!(header.cube_face, 3);
        assert_eq!(header.normalize_output_01, 1);
        assert_eq!(header.p0[0], 2.5);
    }

    #[test]
    fn test_layer_from_settings() {
        let mut layer = NoiseLayer::new(NoiseType::WorleyF2F1).with_weight(0.5);
        layer.worley.seed_offset = 5;
        layer.worley.metric = DistanceMetric::Manhattan;
        let gpu = GpuNoiseLayer::from(&layer.settings(100));
        assert_eq!(gpu.noise_type, 3);
        assert_eq!(gpu.seed, 100);
        assert_eq!(gpu.worley_seed, 105);
        assert_eq!(gpu.worley_metric, 2);
        assert_eq!(gpu.base[2], 0.5);
        assert!(bytemuck::bytes_of(&gpu).len() == 112);
    }
}
