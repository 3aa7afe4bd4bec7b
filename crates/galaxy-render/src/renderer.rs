//! Frame rendering for a built galaxy

use crate::camera::Camera;
use crate::context::RenderContext;
use crate::galaxy_pipeline::{FieldDrawCall, GalaxyPipeline};
use crate::texture_cache::TextureCache;
use galaxy_core::Rgb;
use galaxy_particles::Galaxy;

/// Owns the pipeline, sprite textures, and one draw call per non-empty field
pub struct GalaxyRenderer {
    pipeline: GalaxyPipeline,
    textures: TextureCache,
    draws: Vec<FieldDrawCall>,
    clear_color: wgpu::Color,
}

impl GalaxyRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            pipeline: GalaxyPipeline::new(device, format),
            textures: TextureCache::new(device, queue),
            draws: Vec::new(),
            clear_color: wgpu::Color::BLACK,
        }
    }

    pub fn set_clear_color(&mut self, color: Rgb) {
        self.clear_color = wgpu::Color {
            r: color.r as f64,
            g: color.g as f64,
            b: color.b as f64,
            a: 1.0,
        };
    }

    pub fn textures_mut(&mut self) -> &mut TextureCache {
        &mut self.textures
    }

    /// Upload every field's positions. Replaces any previously prepared draws.
    pub fn prepare(&mut self, device: &wgpu::Device, galaxy: &Galaxy) {
        self.draws = galaxy
            .fields
            .iter()
            .enumerate()
            .filter_map(|(index, field)| {
                let texture = self.textures.get_or_default(field.shading().texture);
                self.pipeline.create_field_draw(device, index, field, texture)
            })
            .collect();
        log::debug!(
            "Prepared {} draw call(s) for {} particles",
            self.draws.len(),
            galaxy.total_particles()
        );
    }

    /// Push this frame's camera and per-field shading parameters
    pub fn update(&self, queue: &wgpu::Queue, camera: &Camera, galaxy: &Galaxy) {
        self.pipeline.write_camera(queue, camera);
        for draw in &self.draws {
            if let Some(field) = galaxy.fields.get(draw.field_index) {
                draw.write_uniforms(queue, field.shading());
            }
        }
    }

    /// Draw one frame into the surface and present it
    pub fn render(&self, context: &RenderContext) -> Result<(), wgpu::SurfaceError> {
        let output = context.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Galaxy Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Galaxy Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.pipeline.draw(&mut render_pass, &self.draws);
        }

        context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
