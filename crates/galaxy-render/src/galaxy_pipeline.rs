//! Instanced galaxy render pipeline
//!
//! Renders camera-facing quads, one instance per particle. The quad is a
//! shared vertex buffer; each field's positions are a per-instance vertex
//! buffer uploaded once at setup. Additive blending, no depth.

use crate::camera::Camera;
use crate::texture_cache::GpuTexture;
use bytemuck::{Pod, Zeroable};
use galaxy_particles::{ParticleField, ShadingParams};
use wgpu::util::DeviceExt;

/// Camera uniforms shared across every field draw in a frame
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 3],
    pub _pad0: f32,
    pub camera_up: [f32; 3],
    pub _pad1: f32,
}

impl CameraUniforms {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_right: camera.right_vector().to_array(),
            _pad0: 0.0,
            camera_up: camera.up_vector().to_array(),
            _pad1: 0.0,
        }
    }
}

/// Per-field uniforms, laid out as WGSL `FieldUniforms` (4 x vec4)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FieldUniforms {
    pub color_size: [f32; 4],
    pub pointer: [f32; 4],
    pub resolution: [f32; 4],
    pub params: [f32; 4],
}

impl FieldUniforms {
    pub fn from_shading(shading: &ShadingParams) -> Self {
        let [r, g, b] = shading.color.to_array();
        let pointer = match shading.pointer {
            Some(p) => [p.x, p.y, p.z, 1.0],
            None => [0.0; 4],
        };
        let (amplitude, has_amplitude) = match shading.amplitude {
            Some(a) => (a, 1.0),
            None => (0.0, 0.0),
        };
        Self {
            color_size: [r, g, b, shading.size],
            pointer,
            resolution: shading.resolution,
            params: [shading.time, amplitude, has_amplitude, 0.0],
        }
    }
}

/// The drawable for one field, built once
pub struct FieldDrawCall {
    /// Index of the source field in `Galaxy::fields`
    pub field_index: usize,
    pub instance_buffer: wgpu::Buffer,
    pub instance_count: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl FieldDrawCall {
    /// Push this frame's shading parameters
    pub fn write_uniforms(&self, queue: &wgpu::Queue, shading: &ShadingParams) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[FieldUniforms::from_shading(shading)]),
        );
    }
}

// Unit quad centered on the origin, two triangles
const QUAD_CORNERS: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [-0.5, 0.5], [0.5, 0.5]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// The galaxy rendering pipeline
pub struct GalaxyPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub camera_bind_group_layout: wgpu::BindGroupLayout,
    pub field_bind_group_layout: wgpu::BindGroupLayout,
    pub quad_vertex_buffer: wgpu::Buffer,
    pub quad_index_buffer: wgpu::Buffer,
    pub camera_buffer: wgpu::Buffer,
    pub camera_bind_group: wgpu::BindGroup,
}

impl GalaxyPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Galaxy Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("galaxy_shader.wgsl").into()),
        });

        // Group 0: camera
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Galaxy Camera Bind Group Layout"),
            });

        // Group 1: field uniforms + sprite texture + sampler
        let field_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some("Galaxy Field Bind Group Layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Galaxy Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &field_bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![1 => Float32x3],
            },
        ];

        // Additive blend (src_alpha + One)
        let additive_blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Galaxy Additive Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_galaxy"),
                buffers: &vertex_layouts,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_galaxy"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(additive_blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Quad Index Buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Persistent uniform buffer for camera data
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Galaxy Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniforms::from_camera(&Camera::default())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("Galaxy Camera Bind Group"),
        });

        Self {
            pipeline,
            camera_bind_group_layout,
            field_bind_group_layout,
            quad_vertex_buffer,
            quad_index_buffer,
            camera_buffer,
            camera_bind_group,
        }
    }

    /// Upload a field's positions and bind its uniforms and texture.
    /// Returns None for an empty field, which has nothing to draw.
    pub fn create_field_draw(
        &self,
        device: &wgpu::Device,
        field_index: usize,
        field: &ParticleField,
        texture: &GpuTexture,
    ) -> Option<FieldDrawCall> {
        if field.positions().is_empty() {
            return None;
        }

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Instance Buffer", field.name())),
            contents: bytemuck::cast_slice(field.positions().as_slice()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Uniform Buffer", field.name())),
            contents: bytemuck::cast_slice(&[FieldUniforms::from_shading(field.shading())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.field_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some(&format!("{} Bind Group", field.name())),
        });

        Some(FieldDrawCall {
            field_index,
            instance_buffer,
            instance_count: field.instance_count(),
            uniform_buffer,
            bind_group,
        })
    }

    /// Push the camera for this frame
    pub fn write_camera(&self, queue: &wgpu::Queue, camera: &Camera) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniforms::from_camera(camera)]),
        );
    }

    /// Record the draws for every prepared field
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, draws: &[FieldDrawCall]) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for draw in draws {
            render_pass.set_bind_group(1, &draw.bind_group, &[]);
            render_pass.set_vertex_buffer(1, draw.instance_buffer.slice(..));
            render_pass.draw_indexed(0..6, 0, 0..draw.instance_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy_core::{Rgb, TextureHandle};
    use glam::Vec3;

    fn shading() -> ShadingParams {
        ShadingParams {
            time: 2.5,
            size: 0.04,
            color: Rgb::new(0.2, 0.4, 0.8),
            texture: TextureHandle(0),
            pointer: None,
            amplitude: None,
            resolution: [800.0, 600.0, 1.0, 800.0 / 600.0],
        }
    }

    #[test]
    fn uniform_layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<CameraUniforms>(), 96);
        assert_eq!(std::mem::size_of::<FieldUniforms>(), 64);
    }

    #[test]
    fn untracked_pointer_packs_zero_flag() {
        let u = FieldUniforms::from_shading(&shading());
        assert_eq!(u.pointer[3], 0.0);
        assert_eq!(u.params, [2.5, 0.0, 0.0, 0.0]);
        assert_eq!(u.color_size, [0.2, 0.4, 0.8, 0.04]);
    }

    #[test]
    fn tracked_pointer_and_amplitude_pack_flags() {
        let mut s = shading();
        s.pointer = Some(Vec3::new(1.0, 0.0, -1.0));
        s.amplitude = Some(0.3);
        let u = FieldUniforms::from_shading(&s);
        assert_eq!(u.pointer, [1.0, 0.0, -1.0, 1.0]);
        assert_eq!(u.params[1], 0.3);
        assert_eq!(u.params[2], 1.0);
    }
}
