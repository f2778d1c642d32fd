// Doll renderer: draws one pose's visible layers back to front through the
// palette swap material

use super::camera::CameraUniform;
use super::palette::{PaletteUniform, SwapTable};
use super::texture::TextureCache;
use super::vertex::{Vertex, QUAD_INDICES};
use crate::core::Direction;
use crate::engine::assets::{AssetManager, TextureHandle};
use crate::engine::scene::{DollScene, LayerId};
use glam::Mat4;
use log::trace;
use wgpu::util::DeviceExt;

/// CPU-side geometry and parameters of one drawn layer
#[derive(Debug, Clone, Copy)]
pub struct LayerQuad {
    pub layer: LayerId,
    pub texture: TextureHandle,
    pub vertices: [Vertex; 4],
    pub palette: PaletteUniform,
}

/// Quads for every drawn layer of `direction`, in draw order.
///
/// A mirrored root reflects its layers about the root position and inverts
/// their horizontal flip. Layers without a material draw unrecolored.
pub fn build_quads(scene: &DollScene, direction: Direction, assets: &AssetManager) -> Vec<LayerQuad> {
    let root = scene.root(direction);

    scene
        .draw_list(direction)
        .into_iter()
        .filter_map(|id| {
            let layer = scene.get(id)?;
            let Some(region) = layer.sprite.and_then(|sprite| assets.sprite(sprite)) else {
                trace!("Layer {} has no resolvable sprite, skipped", layer.name);
                return None;
            };

            let mut center = scene.world_offset(id);
            let mut flip_x = layer.flip_x;
            if root.mirrored {
                center.x = 2.0 * root.position.x - center.x;
                flip_x = !flip_x;
            }

            let palette = match layer.material {
                Some(_) => layer.palette,
                None => SwapTable::identity(0.0),
            };

            Some(LayerQuad {
                layer: id,
                texture: region.texture,
                vertices: Vertex::quad(
                    center,
                    region.size(),
                    region.uv_min,
                    region.uv_max,
                    flip_x,
                    layer.flip_y,
                    layer.tint.to_vec4(),
                ),
                palette: palette.to_uniform(),
            })
        })
        .collect()
}

struct DrawCall {
    texture: TextureHandle,
    palette_bind_group: wgpu::BindGroup,
}

/// Renders a doll scene with per-layer palette parameters
pub struct DollRenderer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    palette_layout: wgpu::BindGroupLayout,
    textures: TextureCache,
    draws: Vec<DrawCall>,
}

impl DollRenderer {
    /// Build the pipeline from the palette swap material's shader source
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, shader_source: &str) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Palette Swap Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
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
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let palette_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Palette Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Doll Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &texture_layout, &palette_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Doll Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Mirrored poses reverse winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[CameraUniform {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Grown on demand in prepare
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Doll Vertex Buffer"),
            size: 1024,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Doll Index Buffer"),
            size: 1024,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            render_pipeline,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            texture_layout,
            palette_layout,
            textures: TextureCache::new(),
            draws: Vec::new(),
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: CameraUniform) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera]));
    }

    /// Upload geometry and palette parameters for the active pose
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &DollScene,
        direction: Direction,
        assets: &AssetManager,
    ) {
        self.draws.clear();

        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for quad in build_quads(scene, direction, assets) {
            if !self
                .textures
                .ensure(device, queue, &self.texture_layout, assets, quad.texture)
            {
                trace!("Texture for layer {:?} is not loaded, skipped", quad.layer);
                continue;
            }

            let base = vertices.len() as u16;
            vertices.extend_from_slice(&quad.vertices);
            indices.extend(QUAD_INDICES.iter().map(|i| base + i));

            let palette_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Palette Buffer"),
                contents: bytemuck::cast_slice(&[quad.palette]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
            let palette_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Palette Bind Group"),
                layout: &self.palette_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: palette_buffer.as_entire_binding(),
                }],
            });

            self.draws.push(DrawCall {
                texture: quad.texture,
                palette_bind_group,
            });
        }

        if self.draws.is_empty() {
            return;
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&vertices);
        if vertex_bytes.len() as u64 > self.vertex_buffer.size() {
            self.vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Doll Vertex Buffer"),
                contents: vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        } else {
            queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        }

        let index_bytes: &[u8] = bytemuck::cast_slice(&indices);
        if index_bytes.len() as u64 > self.index_buffer.size() {
            self.index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Doll Index Buffer"),
                contents: index_bytes,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            });
        } else {
            queue.write_buffer(&self.index_buffer, 0, index_bytes);
        }
    }

    /// Draw what the last `prepare` uploaded
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.draws.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        for (i, draw) in self.draws.iter().enumerate() {
            let Some(texture) = self.textures.get(draw.texture) else {
                continue;
            };
            let first = (i * QUAD_INDICES.len()) as u32;
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            render_pass.set_bind_group(2, &draw.palette_bind_group, &[]);
            render_pass.draw_indexed(first..first + QUAD_INDICES.len() as u32, 0, 0..1);
        }
    }
}
