//! Shape generation for 2D primitives

use std::f64::consts::TAU;

use super::vertex::Vertex;
use crate::sim::Vector2;

/// A filled circle as a triangle fan
///
/// `vertices[0]` is the center, followed by `segments + 1` perimeter
/// vertices where the last repeats the first to close the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct FanMesh {
    pub vertices: Vec<Vertex>,
}

impl FanMesh {
    /// Number of perimeter segments
    pub fn segments(&self) -> u32 {
        self.vertices.len().saturating_sub(2) as u32
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn center(&self) -> Vertex {
        self.vertices[0]
    }

    /// Flat `[x0, y0, x1, y1, ...]` coordinates (`2 + 2 * (segments + 1)` floats)
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Generate a triangle fan approximating a circle
pub fn circle_fan(center: Vector2, radius: f64, segments: u32) -> FanMesh {
    let segments = segments.max(1);
    let step = TAU / segments as f64;

    let mut vertices = Vec::with_capacity(segments as usize + 2);
    vertices.push(Vertex::new(center.x as f32, center.y as f32));

    for i in 0..=segments {
        let theta = step * i as f64;
        vertices.push(Vertex::new(
            (center.x + radius * theta.cos()) as f32,
            (center.y + radius * theta.sin()) as f32,
        ));
    }

    FanMesh { vertices }
}

/// Triangle-list indices that expand a fan of `segments` into triangles
///
/// WebGPU has no fan topology, so each fan triangle `(0, i, i + 1)` is
/// spelled out. The same index list serves every fan with this segment count.
pub fn fan_indices(segments: u32) -> Vec<u16> {
    let mut indices = Vec::with_capacity(segments as usize * 3);
    for i in 1..=segments as u16 {
        indices.extend_from_slice(&[0, i, i + 1]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_fan_shape() {
        let center = Vector2::new(120.0, -40.0);
        let mesh = circle_fan(center, 15.0, 26);

        assert_eq!(mesh.vertex_count(), 28);
        assert_eq!(mesh.segments(), 26);
        assert_eq!(mesh.center(), Vertex::new(120.0, -40.0));
        assert_eq!(mesh.as_floats().len(), 2 + 2 * 27);

        let first = mesh.vertices[1].position;
        let last = mesh.vertices[27].position;
        assert!((first[0] - last[0]).abs() < 1e-3);
        assert!((first[1] - last[1]).abs() < 1e-3);

        for v in &mesh.vertices[1..] {
            let dx = v.position[0] as f64 - center.x;
            let dy = v.position[1] as f64 - center.y;
            assert!(((dx * dx + dy * dy).sqrt() - 15.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_fan_indices() {
        let indices = fan_indices(4);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 5]);
        // Highest index addresses the closing perimeter vertex
        assert_eq!(*indices.iter().max().unwrap() as u32, 4 + 1);
    }
}
