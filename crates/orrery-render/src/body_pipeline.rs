//! Render pipeline for textured celestial body spheres.
//!
//! One shader serves every body: vertices are transformed by a per-body
//! model matrix, fragments sample the body texture and shade it against
//! the sun position (or skip shading when the body is the sun itself).
//! Two pipeline variants share the layouts: opaque for solid bodies and
//! alpha-blended with depth writes off for the atmosphere shells.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::buffer::{MeshBuffer, VertexPositionNormalUv};

/// Blend variant of the body pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyBlend {
    /// Solid body: no blending, depth writes on.
    Opaque,
    /// Atmosphere shell: alpha blending, depth writes off.
    Translucent,
}

/// Per-body GPU uniform.
///
/// The model matrix must carry uniform scale only; normals are transformed
/// by it directly without an inverse-transpose.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BodyUniform {
    /// Model matrix (frame × scale), column-major.
    pub model: [[f32; 4]; 4],
    /// Sun world position in xyz; w is 1.0 for emissive (unlit) bodies.
    pub sun_position: [f32; 4],
    /// Color multiplier; alpha carries the body opacity.
    pub tint: [f32; 4],
}

impl BodyUniform {
    /// Build a uniform from scene facts.
    pub fn new(model: Mat4, sun_position: Vec3, emissive: bool, opacity: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            sun_position: [
                sun_position.x,
                sun_position.y,
                sun_position.z,
                if emissive { 1.0 } else { 0.0 },
            ],
            tint: [1.0, 1.0, 1.0, opacity],
        }
    }
}

/// Pipeline pair for body rendering, sharing bind group layouts.
pub struct BodyPipeline {
    /// Opaque variant.
    pub opaque: wgpu::RenderPipeline,
    /// Alpha-blended variant for atmosphere shells.
    pub translucent: wgpu::RenderPipeline,
    /// Camera uniform bind group layout (group 0).
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    /// Per-body uniform bind group layout (group 2).
    pub body_bind_group_layout: wgpu::BindGroupLayout,
}

impl BodyPipeline {
    /// Create both pipeline variants.
    ///
    /// `texture_bind_group_layout` is the loader's layout for group 1
    /// (texture + sampler).
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("body-shader"),
            source: wgpu::ShaderSource::Wgsl(BODY_SHADER_SOURCE.into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-camera-bind-group-layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(80), // CameraUniform: mat4x4 + vec4
                    },
                    count: None,
                }],
            });

        let body_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("body-bind-group-layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<BodyUniform>() as u64
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[
                &camera_bind_group_layout,
                texture_bind_group_layout,
                &body_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let build = |label: &'static str, blend: BodyBlend| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_body"),
                    buffers: &[VertexPositionNormalUv::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None, // spheres are viewed from outside and inside shells overlap
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: depth_format,
                    depth_write_enabled: blend == BodyBlend::Opaque,
                    depth_compare: wgpu::CompareFunction::GreaterEqual, // reverse-Z
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_body"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: match blend {
                            BodyBlend::Opaque => None,
                            BodyBlend::Translucent => Some(wgpu::BlendState::ALPHA_BLENDING),
                        },
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        let opaque = build("body-pipeline-opaque", BodyBlend::Opaque);
        let translucent = build("body-pipeline-translucent", BodyBlend::Translucent);

        Self {
            opaque,
            translucent,
            camera_bind_group_layout,
            body_bind_group_layout,
        }
    }

    /// The pipeline for the given blend variant.
    pub fn variant(&self, blend: BodyBlend) -> &wgpu::RenderPipeline {
        match blend {
            BodyBlend::Opaque => &self.opaque,
            BodyBlend::Translucent => &self.translucent,
        }
    }
}

/// Draw one body sphere.
pub fn draw_body<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    pipeline: &'a BodyPipeline,
    blend: BodyBlend,
    camera_bind_group: &'a wgpu::BindGroup,
    texture_bind_group: &'a wgpu::BindGroup,
    body_bind_group: &'a wgpu::BindGroup,
    mesh: &'a MeshBuffer,
) {
    render_pass.set_pipeline(pipeline.variant(blend));
    render_pass.set_bind_group(0, camera_bind_group, &[]);
    render_pass.set_bind_group(1, texture_bind_group, &[]);
    render_pass.set_bind_group(2, body_bind_group, &[]);
    mesh.bind(render_pass);
    mesh.draw(render_pass);
}

/// WGSL shader source for body rendering.
pub const BODY_SHADER_SOURCE: &str = r#"
struct CameraUniform {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
};

struct BodyUniform {
    model: mat4x4<f32>,
    sun_position: vec4<f32>, // w = 1.0 for emissive bodies
    tint: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: CameraUniform;

@group(1) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(1) @binding(1)
var s_diffuse: sampler;

@group(2) @binding(0)
var<uniform> body: BodyUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_body(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = body.model * vec4<f32>(in.position, 1.0);
    out.clip_position = camera.view_proj * world;
    out.world_pos = world.xyz;
    // Uniform scale only, so the model matrix rotates normals correctly.
    out.normal = normalize((body.model * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;
    return out;
}

const AMBIENT: f32 = 0.08;

@fragment
fn fs_body(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(t_diffuse, s_diffuse, in.uv) * body.tint;
    let light_dir = normalize(body.sun_position.xyz - in.world_pos);
    let lambert = max(dot(normalize(in.normal), light_dir), 0.0);
    let intensity = max(mix(lambert, 1.0, body.sun_position.w), AMBIENT);
    return vec4<f32>(base.rgb * intensity, base.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_uniform_size_alignment() {
        assert_eq!(std::mem::size_of::<BodyUniform>(), 96);
        assert_eq!(std::mem::size_of::<BodyUniform>() % 16, 0);
    }

    #[test]
    fn test_body_uniform_emissive_flag() {
        let lit = BodyUniform::new(Mat4::IDENTITY, Vec3::ZERO, false, 1.0);
        assert_eq!(lit.sun_position[3], 0.0);
        let emissive = BodyUniform::new(Mat4::IDENTITY, Vec3::ZERO, true, 1.0);
        assert_eq!(emissive.sun_position[3], 1.0);
    }

    #[test]
    fn test_body_uniform_opacity_in_tint_alpha() {
        let shell = BodyUniform::new(Mat4::IDENTITY, Vec3::ZERO, false, 0.5);
        assert_eq!(shell.tint, [1.0, 1.0, 1.0, 0.5]);
    }

    #[test]
    fn test_body_uniform_model_roundtrip() {
        let model = Mat4::from_translation(Vec3::new(20.0, 0.0, 0.0));
        let uniform = BodyUniform::new(model, Vec3::ZERO, false, 1.0);
        assert_eq!(Mat4::from_cols_array_2d(&uniform.model), model);
    }
}
