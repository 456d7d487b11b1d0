//! Immutable 2D vector value type
//!
//! Every operation returns a new value. Math is delegated to `glam::DVec2`.

use std::ops::{Add, Mul, Sub};

use glam::DVec2;

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Vector2) -> Self {
        (DVec2::from(self) + DVec2::from(other)).into()
    }

    pub fn sub(self, other: Vector2) -> Self {
        (DVec2::from(self) - DVec2::from(other)).into()
    }

    pub fn scale(self, scalar: f64) -> Self {
        (DVec2::from(self) * scalar).into()
    }

    pub fn distance_to(self, other: Vector2) -> f64 {
        DVec2::from(self).distance(other.into())
    }

    /// Unnormalized displacement from `self` to `other`
    pub fn direction_to(self, other: Vector2) -> Self {
        other.sub(self)
    }

    pub fn length(self) -> f64 {
        DVec2::from(self).length()
    }

    /// Unit vector in the same direction
    ///
    /// Fails with [`SimError::DegenerateVector`] for the zero vector.
    pub fn unit(self) -> Result<Self, SimError> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Err(SimError::DegenerateVector);
        }
        Ok(self.scale(1.0 / len))
    }

    /// Unit vector, or zero for the zero vector
    pub fn unit_or_zero(self) -> Self {
        self.unit().unwrap_or(Self::ZERO)
    }

    /// Copy unchanged when shorter than `max`, otherwise rescaled to exactly `max`
    pub fn clamp_length(self, max: f64) -> Self {
        let len = self.length();
        if len < max {
            self
        } else if len == 0.0 {
            // len == max == 0
            Self::ZERO
        } else {
            self.scale(max / len)
        }
    }
}

impl From<DVec2> for Vector2 {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Vector2> for DVec2 {
    fn from(v: Vector2) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::add(self, rhs)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::sub(self, rhs)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        self.scale(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_arithmetic() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(4.0, 6.0);
        assert_eq!(a + b, Vector2::new(5.0, 8.0));
        assert_eq!(b - a, Vector2::new(3.0, 4.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(a.direction_to(b), Vector2::new(3.0, 4.0));
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
        assert!((Vector2::new(3.0, 4.0).length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_unit_of_zero_is_degenerate() {
        assert_eq!(Vector2::ZERO.unit(), Err(SimError::DegenerateVector));
        let v = Vector2::ZERO.unit_or_zero();
        assert!(v.x.is_finite() && v.y.is_finite());
        assert_eq!(v, Vector2::ZERO);
    }

    #[test]
    fn test_unit_has_length_one() {
        let u = Vector2::new(-3.0, 4.0).unit().unwrap();
        assert!((u.length() - 1.0).abs() < 1e-12);
        assert!((u.x + 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_length_zero_max() {
        assert_eq!(Vector2::ZERO.clamp_length(0.0), Vector2::ZERO);
        let v = Vector2::new(3.0, 4.0).clamp_length(0.0);
        assert_eq!(v.length(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_clamp_length(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            max in 0.0f64..500.0,
        ) {
            let v = Vector2::new(x, y);
            let clamped = v.clamp_length(max);
            if v.length() < max {
                prop_assert_eq!(clamped, v);
            } else {
                prop_assert!((clamped.length() - max).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_unit_is_finite(x in -1e6f64..1e6, y in -1e6f64..1e6) {
            let u = Vector2::new(x, y).unit_or_zero();
            prop_assert!(u.x.is_finite() && u.y.is_finite());
        }
    }
}
