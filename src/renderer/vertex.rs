//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Untinted silhouette colours standing in for sprite artwork (0xRRGGBB)
pub mod colors {
    pub const AMBIENT: u32 = 0xc9a46a;
    pub const SWIMMER: u32 = 0xffa24a;
    pub const BOAT_HULL: u32 = 0x8b5a2b;
    pub const BOAT_FIGURE: u32 = 0x3a3f58;
    pub const HOOK: u32 = 0xd9d9e0;
    pub const CLOUD: u32 = 0xffffff;
    pub const SKY_WASH: u32 = 0xffffff;
    pub const SKY_WASH_ALPHA: f32 = 0.05;
}
