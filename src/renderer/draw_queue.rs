//! CPU-side queue of blob draws for one frame
//!
//! Collects fan vertices and per-draw uniforms in submission order. The
//! pipeline uploads the result once per frame.

use super::MeshSink;
use super::shapes::FanMesh;
use super::vertex::{DrawUniforms, Vertex};
use crate::consts::MAX_FAN_SEGMENTS;

/// One queued blob draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedDraw {
    /// Offset of the fan's center vertex in the frame's vertex list
    pub first_vertex: u32,
    pub vertex_count: u32,
    pub index_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DrawQueue {
    vertices: Vec<Vertex>,
    uniforms: Vec<DrawUniforms>,
    draws: Vec<QueuedDraw>,
    /// Drawable size in device pixels, stamped on each draw as it is queued
    resolution: (u32, u32),
}

impl DrawQueue {
    pub fn new(resolution: (u32, u32)) -> Self {
        Self {
            resolution,
            ..Default::default()
        }
    }

    pub fn set_resolution(&mut self, resolution: (u32, u32)) {
        self.resolution = resolution;
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.uniforms.clear();
        self.draws.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn uniforms(&self) -> &[DrawUniforms] {
        &self.uniforms
    }

    pub fn draws(&self) -> &[QueuedDraw] {
        &self.draws
    }

    /// Uniforms laid out one per `stride`-byte slot for dynamic offsets
    pub fn uniform_bytes(&self, stride: usize) -> Vec<u8> {
        let size = std::mem::size_of::<DrawUniforms>();
        debug_assert!(stride >= size);
        let mut bytes = vec![0u8; stride * self.uniforms.len()];
        for (slot, uniforms) in bytes.chunks_exact_mut(stride).zip(&self.uniforms) {
            slot[..size].copy_from_slice(bytemuck::bytes_of(uniforms));
        }
        bytes
    }
}

impl MeshSink for DrawQueue {
    fn draw_mesh(&mut self, mesh: &FanMesh, fill: [f32; 4]) {
        let segments = mesh.segments();
        if segments == 0 || segments > MAX_FAN_SEGMENTS {
            log::warn!("Skipping fan with {} segments", segments);
            return;
        }

        self.draws.push(QueuedDraw {
            first_vertex: self.vertices.len() as u32,
            vertex_count: mesh.vertex_count(),
            index_count: segments * 3,
        });
        self.vertices.extend_from_slice(&mesh.vertices);
        self.uniforms.push(DrawUniforms::new(self.resolution, fill));
    }
}
