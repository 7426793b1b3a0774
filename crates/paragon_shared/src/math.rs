//! Vector type for navigation geometry.
//!
//! Path vertices and the offsets between them.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// 3D Vector - path vertices, offsets, positions
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector (the origin every path is delta-encoded from)
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Largest absolute per-component difference.
    #[must_use]
    pub fn max_component_delta(self, other: Self) -> f32 {
        let d = self - other;
        d.x.abs().max(d.y.abs()).max(d.z.abs())
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));

        let mut acc = Vec3::ZERO;
        acc += a;
        acc += b;
        assert_eq!(acc, sum);
        assert_eq!(sum - b, a);
        assert_eq!(a.to_string(), "(1, 2, 3)");
    }

    #[test]
    fn test_max_component_delta() {
        let a = Vec3::new(1.0, -2.0, 3.0);
        let b = Vec3::new(1.5, 2.0, 2.0);
        assert_eq!(a.max_component_delta(b), 4.0);
        assert_eq!(a.max_component_delta(a), 0.0);
    }
}
