//! A single circular blob: physics and mesh


use super::vector::Vector2;
use crate::circle_area_to_radius;
use crate::consts::*;
use crate::renderer::{FanMesh, circle_fan};

/// Unique player identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub owner: PlayerId,
    /// Abstract size; the area is `size * AREA_MULTIPLIER`
    size: f64,
    pub position: Vector2,
    pub velocity: Vector2,
    radius: f64,
}

impl Blob {
    /// Create a blob at rest. `size` must be positive.
    pub fn new(owner: PlayerId, size: f64, position: Vector2) -> Self {
        Self::with_velocity(owner, size, position, Vector2::ZERO)
    }

    pub fn with_velocity(owner: PlayerId, size: f64, position: Vector2, velocity: Vector2) -> Self {
        debug_assert!(size > 0.0, "blob size must be positive, got {size}");
        Self {
            owner,
            size,
            position,
            velocity,
            radius: radius_for(size),
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Change the size, keeping the radius in step
    pub fn set_size(&mut self, size: f64) {
        debug_assert!(size > 0.0, "blob size must be positive, got {size}");
        self.size = size;
        self.radius = radius_for(size);
    }

    pub fn can_split(&self) -> bool {
        self.size >= MIN_SPLIT_SIZE
    }

    /// Two half-size children sharing position, velocity and owner
    ///
    /// Returns `None` below [`MIN_SPLIT_SIZE`]. The parent is left untouched.
    pub fn split(&self) -> Option<(Blob, Blob)> {
        if !self.can_split() {
            return None;
        }
        let half = self.size / 2.0;
        let child = Blob::with_velocity(self.owner, half, self.position, self.velocity);
        Some((child.clone(), child))
    }

    /// Advance one step of `dt` milliseconds, seeking `target`
    ///
    /// The seek displacement is added to velocity, the sum is scaled by
    /// `SEEK_GAIN * dt` (dt in seconds) and capped at `MAX_SPEED`, then the
    /// blob moves by `velocity * dt`.
    pub fn update(&mut self, dt: f64, target: Vector2) {
        self.radius = radius_for(self.size);

        let seek = self.position.direction_to(target);
        self.velocity = self
            .velocity
            .add(seek)
            .scale(SEEK_GAIN * dt * 1e-3)
            .clamp_length(MAX_SPEED);
        self.position = self.position.add(self.velocity.scale(dt));
    }

    /// Triangle-fan mesh of this blob's circle
    pub fn draw(&self, segments: u32) -> FanMesh {
        circle_fan(self.position, self.radius, segments)
    }
}

fn radius_for(size: f64) -> f64 {
    circle_area_to_radius(size * AREA_MULTIPLIER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    fn blob(size: f64) -> Blob {
        Blob::with_velocity(
            PlayerId(7),
            size,
            Vector2::new(100.0, 200.0),
            Vector2::new(1.5, -2.0),
        )
    }

    #[test]
    fn test_radius_from_size() {
        let b = blob(500.0);
        assert!((b.radius() - (500.0 * AREA_MULTIPLIER / PI).sqrt()).abs() < 1e-9);

        let mut b = b;
        b.set_size(8.0);
        assert!((b.radius() - (8.0 * AREA_MULTIPLIER / PI).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_split_halves_and_copies() {
        let parent = blob(500.0);
        let (a, b) = parent.split().expect("large blob splits");

        assert_eq!(a.size(), 250.0);
        assert_eq!(b.size(), 250.0);
        assert_eq!(a.size() + b.size(), parent.size());
        for child in [&a, &b] {
            assert_eq!(child.position, parent.position);
            assert_eq!(child.velocity, parent.velocity);
            assert_eq!(child.owner, parent.owner);
        }
        // Parent untouched
        assert_eq!(parent.size(), 500.0);
    }

    #[test]
    fn test_split_floor() {
        assert!(blob(MIN_SPLIT_SIZE).split().is_some());
        assert!(blob(MIN_SPLIT_SIZE * 0.99).split().is_none());
    }

    #[test]
    fn test_update_moves_toward_target() {
        let mut b = Blob::new(PlayerId(1), 100.0, Vector2::ZERO);
        let target = Vector2::new(300.0, 0.0);
        let before = b.position.distance_to(target);
        b.update(TIMESTEP_MS, target);
        assert!(b.position.x > 0.0);
        assert!(b.position.distance_to(target) < before);
        assert_eq!(b.position.y, 0.0);
    }

    #[test]
    fn test_update_at_target_stays_finite() {
        let mut b = Blob::new(PlayerId(1), 100.0, Vector2::new(50.0, 50.0));
        b.update(TIMESTEP_MS, Vector2::new(50.0, 50.0));
        assert_eq!(b.velocity, Vector2::ZERO);
        assert_eq!(b.position, Vector2::new(50.0, 50.0));
    }

    #[test]
    fn test_seek_converges() {
        let mut b = Blob::new(PlayerId(1), 100.0, Vector2::ZERO);
        let target = Vector2::new(400.0, -250.0);
        for _ in 0..600 {
            b.update(TIMESTEP_MS, target);
        }
        assert!(b.position.distance_to(target) < 1.0);
    }

    #[test]
    fn test_draw_mesh() {
        let b = blob(500.0);
        let mesh = b.draw(20);
        assert_eq!(mesh.vertex_count(), 22);
        assert_eq!(mesh.center().position, [100.0, 200.0]);
        let first = mesh.vertices[1].position;
        let last = mesh.vertices[21].position;
        assert!((first[0] - last[0]).abs() < 1e-3 && (first[1] - last[1]).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_update_invariants(
            size in 0.5f64..10_000.0,
            px in -5_000.0f64..5_000.0,
            py in -5_000.0f64..5_000.0,
            vx in -1_000.0f64..1_000.0,
            vy in -1_000.0f64..1_000.0,
            tx in -10_000.0f64..10_000.0,
            ty in -10_000.0f64..10_000.0,
            dt in 0.0f64..100.0,
        ) {
            let mut b = Blob::with_velocity(
                PlayerId(0),
                size,
                Vector2::new(px, py),
                Vector2::new(vx, vy),
            );
            b.update(dt, Vector2::new(tx, ty));

            let expected = (b.size() * AREA_MULTIPLIER / PI).sqrt();
            prop_assert!((b.radius() - expected).abs() < 1e-9);
            prop_assert!(b.velocity.length() <= MAX_SPEED + 1e-9);
            prop_assert!(b.position.x.is_finite() && b.position.y.is_finite());
        }
    }
}
