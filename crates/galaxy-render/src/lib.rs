//! Galaxy Render - wgpu renderer for the particle galaxy
//!
//! Draws each particle field as instanced, camera-facing sprites with
//! additive blending. Positions are uploaded once per field; every frame
//! only the camera and per-field shading uniforms change.

mod camera;
mod context;
pub mod galaxy_pipeline;
pub mod loader;
mod renderer;
mod texture_cache;

pub use camera::{Camera, DEFAULT_DAMPING};
pub use context::RenderContext;
pub use galaxy_pipeline::{CameraUniforms, FieldDrawCall, FieldUniforms, GalaxyPipeline};
pub use renderer::GalaxyRenderer;
pub use texture_cache::{GpuTexture, SpriteImage, TextureCache, GLOW_SPRITE_SIZE};
