//! Plain 2D vector algebra used by the path planner
//!
//! Everything here is a pure function of its inputs.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A real-valued point (or vector) on the screen plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Length of the vector from the origin
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point2D) -> f64 {
        (other - self).magnitude()
    }

    /// Unit vector in the same direction
    ///
    /// Returns the zero vector when the magnitude is zero.
    pub fn unit(self) -> Point2D {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Point2D::ZERO;
        }
        Point2D::new(self.x / mag, self.y / mag)
    }

    /// Rotate by 90 degrees: `(x, y) -> (-y, x)`
    pub fn perpendicular(self) -> Point2D {
        Point2D::new(-self.y, self.x)
    }

    /// Same direction, new length. The zero vector stays zero.
    pub fn with_magnitude(self, magnitude: f64) -> Point2D {
        self.unit() * magnitude
    }

    /// Linear interpolation: `t = 0` gives `self`, `t = 1` gives `other`
    pub fn lerp(self, other: Point2D, t: f64) -> Point2D {
        self + (other - self) * t
    }

    pub fn dot(self, other: Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product
    pub fn cross(self, other: Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Nearest integer pixel
    pub fn rounded(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    fn mul(self, scalar: f64) -> Point2D {
        Point2D::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Point2D {
    type Output = Point2D;

    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Point2D::new(x, y)
    }
}
