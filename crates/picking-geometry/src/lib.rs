#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for 3D warehouse coordinates."]
#![doc = ""]
#![doc = "This crate provides the point type used to describe storage positions"]
#![doc = "and the Euclidean metric used to rank and walk picking routes."]

use core::fmt;
use libm::hypot;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point `(x, y, z)` in the warehouse frame.
///
/// Points carry no identity beyond their coordinates: two points with the
/// same coordinates are the same location.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3D {
    /// Warehouse-frame x coordinate.
    pub x: f64,
    /// Warehouse-frame y coordinate.
    pub y: f64,
    /// Warehouse-frame z coordinate (shelf height).
    pub z: f64,
}

impl Point3D {
    /// Construct a new point.
    ///
    /// Non-finite coordinates are accepted and propagate through [`distance`]
    /// per IEEE-754.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3D { x, y, z }
    }

    /// Euclidean distance from `self` to `other`. See [`distance`].
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        distance(*self, *other)
    }
}

impl fmt::Display for Point3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, z: {:.2})", self.x, self.y, self.z)
    }
}

/// Straight-line distance between two points.
///
/// `sqrt((a.x - b.x)² + (a.y - b.y)² + (a.z - b.z)²)`
///
/// The metric is symmetric, zero iff `a == b`, and satisfies the triangle
/// inequality for finite inputs. NaN or infinite coordinates yield NaN or
/// infinity. Squares are never formed directly, so finite coordinates whose
/// difference is finite give a finite distance.
pub fn distance(a: Point3D, b: Point3D) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    hypot(hypot(dx, dy), dz)
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_distance_pythagorean_triple() {
        let origin = Point3D::new(0.0, 0.0, 0.0);
        let p = Point3D::new(3.0, 4.0, 0.0);
        assert!((distance(origin, p) - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_distance_all_axes() {
        let a = Point3D::new(1.0, 2.0, 3.0);
        let b = Point3D::new(3.0, 5.0, 9.0);
        // dx = 2, dy = 3, dz = 6 -> sqrt(4 + 9 + 36) = 7
        assert!((distance(a, b) - 7.0).abs() < EPSILON);
        assert!((a.distance_to(&b) - 7.0).abs() < EPSILON);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point3D::new(-1.5, 2.25, 10.0);
        let b = Point3D::new(4.0, -3.0, 0.5);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = Point3D::new(12.0, -7.0, 3.5);
        assert_eq!(distance(a, a), 0.0);
        assert!(distance(a, Point3D::new(12.0, -7.0, 3.6)) > 0.0);
    }

    #[test]
    fn test_triangle_inequality() {
        let a = Point3D::new(0.0, 0.0, 0.0);
        let b = Point3D::new(2.0, 7.0, 1.0);
        let c = Point3D::new(-4.0, 3.0, 8.0);
        assert!(distance(a, c) <= distance(a, b) + distance(b, c) + EPSILON);
    }

    #[test]
    fn test_non_finite_propagates() {
        let a = Point3D::new(f64::NAN, 0.0, 0.0);
        let b = Point3D::new(f64::INFINITY, 0.0, 0.0);
        let origin = Point3D::default();
        assert!(distance(a, origin).is_nan());
        assert!(distance(b, origin).is_infinite());
    }

    #[test]
    fn test_large_coordinates_stay_finite() {
        let a = Point3D::new(-1e200, 0.0, 0.0);
        let b = Point3D::new(1e200, 0.0, 0.0);
        let d = distance(a, b);
        assert!(d.is_finite());
        assert!((d / 2e200 - 1.0).abs() < EPSILON);

        let c = Point3D::new(1e200, 1e200, 1e200);
        let expected = 1e200 * 3f64.sqrt();
        assert!((distance(Point3D::default(), c) / expected - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_display() {
        let p = Point3D::new(1.0, 2.5, -3.126);
        assert_eq!(format!("{}", p), "(x: 1.00, y: 2.50, z: -3.13)");
    }
}
