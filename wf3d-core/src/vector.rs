/// Homogeneous vectors and screen points
use std::ops::{Add, Neg, Sub};

use nalgebra::Vector4;

use crate::transform::Matrix4;

/// A homogeneous 3D vector.
///
/// Points carry `w = 1`. Sums and differences keep the left operand's `w`, so
/// point minus point is still tagged as a point; code working with directions
/// must not rely on `w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3H {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vector3H {
    /// Create a point (`w = 1`).
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    pub fn with_w(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean length over x, y and z.
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scale x, y and z to unit length.
    ///
    /// A zero-length vector is returned unchanged. `w` is never touched.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::with_w(self.x / len, self.y / len, self.z / len, self.w)
        } else {
            *self
        }
    }

    pub fn mul_elementwise(&self, other: &Self) -> Self {
        Self::with_w(self.x * other.x, self.y * other.y, self.z * other.z, self.w)
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product of the x, y and z parts. The result has `w = 1`.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Angle in radians between two non-zero vectors.
    pub fn angle(&self, other: &Self) -> f64 {
        let cos = self.dot(other) / (self.length() * other.length());
        // rounding on (anti)parallel inputs can push cos just past +/-1
        cos.clamp(-1.0, 1.0).acos()
    }

    /// Apply `m` to all four homogeneous components.
    pub fn transform(&self, m: &Matrix4) -> Self {
        m.transform(self)
    }

    /// Component-wise minimum of x, y and z, as a point.
    pub fn min(&self, other: &Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum of x, y and z, as a point.
    pub fn max(&self, other: &Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }
}

impl Default for Vector3H {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Vector3H {
    type Output = Vector3H;

    fn add(self, rhs: Vector3H) -> Vector3H {
        Vector3H::with_w(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w)
    }
}

impl Sub for Vector3H {
    type Output = Vector3H;

    fn sub(self, rhs: Vector3H) -> Vector3H {
        Vector3H::with_w(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w)
    }
}

impl Neg for Vector3H {
    type Output = Vector3H;

    fn neg(self) -> Vector3H {
        Vector3H::with_w(-self.x, -self.y, -self.z, self.w)
    }
}

impl From<Vector3H> for Vector4<f64> {
    fn from(v: Vector3H) -> Self {
        Vector4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4<f64>> for Vector3H {
    fn from(v: Vector4<f64>) -> Self {
        Vector3H::with_w(v.x, v.y, v.z, v.w)
    }
}

/// A point on the raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
impl approx::AbsDiffEq for Vector3H {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
            && (self.w - other.w).abs() <= epsilon
    }
}

#[cfg(test)]
impl approx::AbsDiffEq for Point2 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}
