//! wgpu rendering: GPU context and surface management, depth buffering,
//! camera matrices, sphere meshes, texture loading, and the body pipeline.

pub mod body_pipeline;
pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod sphere;
pub mod texture;

pub use body_pipeline::{BODY_SHADER_SOURCE, BodyBlend, BodyPipeline, BodyUniform, draw_body};
pub use buffer::{BufferAllocator, IndexData, MeshBuffer, VertexPositionNormalUv};
pub use camera::{Camera, CameraUniform, Projection};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use sphere::{SphereMesh, generate_uv_sphere};
pub use texture::{LoadedTexture, TextureError, TextureLoader};
