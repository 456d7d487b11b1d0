//! Players: an identity aggregating one or more blobs


use super::blob::{Blob, PlayerId};
use super::vector::Vector2;
use crate::renderer::MeshSink;
use crate::settings::Rgb;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: Rgb,
    /// Size-weighted centroid of the blobs (derived each update)
    position: Vector2,
    /// Sum of blob sizes (derived each update)
    size: f64,
    /// Render order: later blobs paint over earlier ones
    blobs: Vec<Blob>,
}

impl Player {
    /// Create a player with a single seed blob
    pub fn new(id: PlayerId, name: impl Into<String>, color: Rgb, position: Vector2, size: f64) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            position,
            size,
            blobs: vec![Blob::new(id, size, position)],
        }
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    /// Split every blob at once, replacing the collection with all children
    ///
    /// Blobs under the split floor are carried over unchanged. Returns how
    /// many blobs split.
    pub fn split(&mut self) -> usize {
        let mut split_count = 0;
        let mut next = Vec::with_capacity(self.blobs.len() * 2);
        for blob in &self.blobs {
            match blob.split() {
                Some((a, b)) => {
                    next.push(a);
                    next.push(b);
                    split_count += 1;
                }
                None => next.push(blob.clone()),
            }
        }
        self.blobs = next;
        self.refresh_aggregates();
        split_count
    }

    /// Advance every blob by `dt` milliseconds toward `target`
    pub fn update(&mut self, dt: f64, target: Vector2) {
        for blob in &mut self.blobs {
            blob.update(dt, target);
        }
        self.refresh_aggregates();
    }

    /// Submit every blob's mesh in collection order
    pub fn draw(&self, sink: &mut impl MeshSink, segments: u32) {
        let fill = self.color.to_fill();
        for blob in &self.blobs {
            sink.draw_mesh(&blob.draw(segments), fill);
        }
    }

    fn refresh_aggregates(&mut self) {
        self.size = self.blobs.iter().map(Blob::size).sum();
        if self.size > 0.0 {
            let weighted = self
                .blobs
                .iter()
                .fold(Vector2::ZERO, |acc, b| acc + b.position * b.size());
            self.position = weighted * (1.0 / self.size);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::consts::{MIN_SPLIT_SIZE, TIMESTEP_MS};
    use crate::renderer::FanMesh;

    /// Records every submitted mesh
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub draws: Vec<(FanMesh, [f32; 4])>,
    }

    impl MeshSink for RecordingSink {
        fn draw_mesh(&mut self, mesh: &FanMesh, fill: [f32; 4]) {
            self.draws.push((mesh.clone(), fill));
        }
    }

    fn player(size: f64) -> Player {
        Player::new(PlayerId(0), "Matt", Rgb::new(0, 128, 0), Vector2::new(500.0, 500.0), size)
    }

    #[test]
    fn test_new_player_has_one_blob() {
        let p = player(500.0);
        assert_eq!(p.blobs().len(), 1);
        assert_eq!(p.size(), 500.0);
        assert_eq!(p.blobs()[0].owner, PlayerId(0));
    }

    #[test]
    fn test_split_doubles_and_conserves() {
        let mut p = player(512.0);
        for round in 1..=3 {
            let before: f64 = p.blobs().iter().map(Blob::size).sum();
            let n = p.blobs().len();
            assert_eq!(p.split(), n);
            assert_eq!(p.blobs().len(), 2 * n, "round {round}");
            let after: f64 = p.blobs().iter().map(Blob::size).sum();
            assert_eq!(before, after);
        }
        assert_eq!(p.blobs().len(), 8);
        assert!(p.blobs().iter().all(|b| b.size() == 64.0));
    }

    #[test]
    fn test_split_respects_floor() {
        let mut p = player(MIN_SPLIT_SIZE);
        assert_eq!(p.split(), 1);
        assert_eq!(p.blobs().len(), 2);
        // Children are at 1.0, under the floor
        assert_eq!(p.split(), 0);
        assert_eq!(p.blobs().len(), 2);
        assert_eq!(p.size(), MIN_SPLIT_SIZE);
    }

    #[test]
    fn test_update_rederives_aggregates() {
        let mut p = player(300.0);
        p.split();
        p.update(TIMESTEP_MS, Vector2::new(800.0, 500.0));
        assert_eq!(p.size(), 300.0);
        // Children share position, so the centroid is that position
        assert!(p.position().distance_to(p.blobs()[0].position) < 1e-9);
        assert!(p.position().x > 500.0);
    }

    #[test]
    fn test_draw_in_collection_order() {
        let mut p = player(400.0);
        p.split();
        let mut sink = RecordingSink::default();
        p.draw(&mut sink, 16);

        assert_eq!(sink.draws.len(), 2);
        for (mesh, fill) in &sink.draws {
            assert_eq!(mesh.vertex_count(), 18);
            assert_eq!(*fill, p.color.to_fill());
        }
    }
}
