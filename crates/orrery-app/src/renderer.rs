//! GPU resource wiring for the solar-system scene.
//!
//! Owns the sphere meshes, the body pipeline, the per-body uniform slots,
//! and the textures, and turns the scene's draw list into render passes.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec3;
use tracing::info;
use wgpu::util::DeviceExt;

use orrery_config::SceneConfig;
use orrery_render::{
    BodyBlend, BodyPipeline, BodyUniform, BufferAllocator, Camera, DepthBuffer, FrameEncoder,
    IndexData, LoadedTexture, MeshBuffer, RenderContext, RenderPassBuilder, SurfaceError,
    TextureError, TextureLoader, draw_body, generate_uv_sphere,
};
use orrery_scene::{BodyDraw, SphereDetail, TextureSlot};

/// Uniform buffer and bind group for one draw-list entry.
struct BodySlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// All GPU state needed to draw the scene.
pub struct SceneRenderer {
    depth_buffer: DepthBuffer,
    pipeline: BodyPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    sphere_high: MeshBuffer,
    sphere_low: MeshBuffer,
    textures: HashMap<TextureSlot, Arc<LoadedTexture>>,
    body_slots: Vec<BodySlot>,
}

impl SceneRenderer {
    /// Build meshes, pipelines, uniform slots, and load the scene textures.
    ///
    /// The texture list mirrors the scene's five references (the cloud file
    /// appears twice); the loader's path cache collapses duplicates to a
    /// single decode and upload.
    pub fn new(
        gpu: &RenderContext,
        scene_config: &SceneConfig,
        draw_count: usize,
    ) -> Result<Self, TextureError> {
        let mut loader = TextureLoader::new(&gpu.device);

        let references = [
            (
                TextureSlot::PlanetSurface,
                scene_config.texture_path(&scene_config.planet_texture),
            ),
            (
                TextureSlot::Clouds,
                scene_config.texture_path(&scene_config.clouds_texture),
            ),
            (
                TextureSlot::MoonSurface,
                scene_config.texture_path(&scene_config.moon_texture),
            ),
            (
                TextureSlot::Clouds,
                scene_config.texture_path(&scene_config.clouds_texture),
            ),
            (
                TextureSlot::SunSurface,
                scene_config.texture_path(&scene_config.sun_texture),
            ),
        ];

        let reference_count = references.len();
        let mut textures = HashMap::new();
        for (slot, path) in references {
            let texture = loader.load_file(&gpu.device, &gpu.queue, &path)?;
            textures.insert(slot, texture);
        }
        info!(
            "Scene textures ready: {} references, {} resident",
            reference_count,
            loader.len()
        );

        let pipeline = BodyPipeline::new(
            &gpu.device,
            gpu.surface_format,
            DepthBuffer::FORMAT,
            loader.bind_group_layout(),
        );

        let depth_buffer = DepthBuffer::new(
            &gpu.device,
            gpu.surface_config.width,
            gpu.surface_config.height,
        );

        let allocator = BufferAllocator::new(&gpu.device);
        let high = generate_uv_sphere(SphereDetail::High.slices(), SphereDetail::High.stacks());
        let sphere_high = allocator.create_mesh(
            "sphere-high",
            bytemuck::cast_slice(&high.vertices()),
            IndexData::U16(&high.indices),
        );
        let low = generate_uv_sphere(SphereDetail::Low.slices(), SphereDetail::Low.stacks());
        let sphere_low = allocator.create_mesh(
            "sphere-low",
            bytemuck::cast_slice(&low.vertices()),
            IndexData::U16(&low.indices),
        );

        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("camera-uniform"),
                contents: bytemuck::cast_slice(&[Camera::default().to_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera-bind-group"),
            layout: &pipeline.camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let body_slots = (0..draw_count)
            .map(|i| {
                let placeholder =
                    BodyUniform::new(glam::Mat4::IDENTITY, Vec3::ZERO, false, 1.0);
                let buffer = gpu
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("body-{i}-uniform")),
                        contents: bytemuck::cast_slice(&[placeholder]),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    });
                let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("body-{i}-bind-group")),
                    layout: &pipeline.body_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                BodySlot { buffer, bind_group }
            })
            .collect();

        Ok(Self {
            depth_buffer,
            pipeline,
            camera_buffer,
            camera_bind_group,
            sphere_high,
            sphere_low,
            textures,
            body_slots,
        })
    }

    /// Resize the depth buffer to match a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_buffer.resize(device, width, height);
    }

    /// Render one frame of the scene.
    ///
    /// The draw list arrives ordered solid-then-translucent, so a single
    /// pass draws everything in order with the blend variant per entry.
    pub fn render(
        &self,
        gpu: &RenderContext,
        camera: &Camera,
        draws: &[BodyDraw],
        sun_position: Vec3,
    ) -> Result<(), SurfaceError> {
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform()]),
        );
        for (slot, draw) in self.body_slots.iter().zip(draws) {
            let uniform = BodyUniform::new(draw.model, sun_position, draw.emissive, draw.opacity);
            gpu.queue
                .write_buffer(&slot.buffer, 0, bytemuck::cast_slice(&[uniform]));
        }

        let surface_texture = gpu.get_current_texture()?;
        let mut frame = FrameEncoder::new(&gpu.device, Arc::new(gpu.queue.clone()), surface_texture);

        let builder = RenderPassBuilder::new()
            .label("scene-pass")
            .depth(self.depth_buffer.view.clone(), DepthBuffer::CLEAR_VALUE);

        {
            let mut render_pass = frame.begin_render_pass(&builder);
            for (slot, draw) in self.body_slots.iter().zip(draws) {
                let blend = if draw.is_translucent() {
                    BodyBlend::Translucent
                } else {
                    BodyBlend::Opaque
                };
                let texture = &self.textures[&draw.texture];
                let mesh = match draw.detail {
                    SphereDetail::High => &self.sphere_high,
                    SphereDetail::Low => &self.sphere_low,
                };
                draw_body(
                    &mut render_pass,
                    &self.pipeline,
                    blend,
                    &self.camera_bind_group,
                    &texture.bind_group,
                    &slot.bind_group,
                    mesh,
                );
            }
        }

        frame.submit();
        Ok(())
    }
}
