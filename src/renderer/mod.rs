//! WebGPU rendering module
//!
//! Blobs describe themselves as triangle fans; the pipeline uploads each fan
//! and issues one draw per blob with its own fill color.

pub mod draw_queue;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use draw_queue::{DrawQueue, QueuedDraw};
pub use pipeline::BlobRenderer;
pub use shapes::{FanMesh, circle_fan, fan_indices};
pub use vertex::{DrawUniforms, Vertex};

/// Receives blob meshes in paint order
pub trait MeshSink {
    fn draw_mesh(&mut self, mesh: &FanMesh, fill: [f32; 4]);
}
