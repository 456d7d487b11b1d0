//! Vertex and uniform types for blob rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex, bound to `a_position`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

impl Vertex {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

/// Per-draw uniforms (must match `DrawUniforms` in the shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub u_resolution: [f32; 2], // offset 0
    pub _pad: [f32; 2],         // vec4 below needs 16-byte alignment
    pub u_fill: [f32; 4],       // offset 16
}

impl DrawUniforms {
    pub fn new(resolution: (u32, u32), fill: [f32; 4]) -> Self {
        Self {
            u_resolution: [resolution.0 as f32, resolution.1 as f32],
            _pad: [0.0; 2],
            u_fill: fill,
        }
    }
}

/// Colors
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 32);
        assert_eq!(std::mem::offset_of!(DrawUniforms, u_fill), 16);
        assert_eq!(std::mem::size_of::<Vertex>(), 2 * std::mem::size_of::<f32>());
    }
}
