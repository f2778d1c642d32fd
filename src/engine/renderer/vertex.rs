// Vertex layout and quad geometry for layer sprites

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Vertex for 2D sprite rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in 3D space (z unused; layers are drawn back to front)
    pub position: [f32; 3],
    /// Texture coordinates (UV)
    pub tex_coords: [f32; 2],
    /// Tint multiplied into the sampled color
    pub color: [f32; 4],
}

/// Index pattern of one quad built by `Vertex::quad`
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

impl Vertex {
    pub fn new(position: Vec3, tex_coords: Vec2, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            tex_coords: tex_coords.to_array(),
            color: color.to_array(),
        }
    }

    /// Counter-clockwise quad (bottom-left first) covering `size` pixels around
    /// `center`, sampling the `uv_min..uv_max` region of its texture.
    ///
    /// Image rows grow downward, so the top edge samples `uv_min.y`. Flips
    /// swap the UVs rather than the corners.
    pub fn quad(
        center: Vec2,
        size: Vec2,
        uv_min: Vec2,
        uv_max: Vec2,
        flip_x: bool,
        flip_y: bool,
        color: Vec4,
    ) -> [Vertex; 4] {
        let half = size * 0.5;
        let (u_left, u_right) = if flip_x { (uv_max.x, uv_min.x) } else { (uv_min.x, uv_max.x) };
        let (v_bottom, v_top) = if flip_y { (uv_min.y, uv_max.y) } else { (uv_max.y, uv_min.y) };

        let corner = |dx: f32, dy: f32, u: f32, v: f32| {
            Vertex::new(
                Vec3::new(center.x + dx * half.x, center.y + dy * half.y, 0.0),
                Vec2::new(u, v),
                color,
            )
        };

        [
            corner(-1.0, -1.0, u_left, v_bottom),
            corner(1.0, -1.0, u_right, v_bottom),
            corner(1.0, 1.0, u_right, v_top),
            corner(-1.0, 1.0, u_left, v_top),
        ]
    }

    /// Get the vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Tex Coords
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // Color
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}
