/// 4x4 transformation matrices and the animated model spin
use std::ops::{Index, Mul};
use std::time::Duration;

use nalgebra::Vector4;

use crate::config::SINGULAR_EPSILON;
use crate::error::GeometryError;
use crate::vector::Vector3H;

/// A 4x4 affine transform.
///
/// Entries are addressed as `(row, column)`. Vectors are transformed by
/// dotting each row with `(x, y, z, w)`, so translations live in the fourth
/// column and the right-hand factor of a product is applied first:
/// `(a * b).transform(v) == a.transform(&b.transform(v))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    m: nalgebra::Matrix4<f64>,
}

impl Matrix4 {
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self {
            m: nalgebra::Matrix4::from_fn(|r, c| rows[r][c]),
        }
    }

    pub fn identity() -> Self {
        Self {
            m: nalgebra::Matrix4::identity(),
        }
    }

    pub fn rows(&self) -> [[f64; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, entry) in row.iter_mut().enumerate() {
                *entry = self.m[(r, c)];
            }
        }
        rows
    }

    /// Matrix product `self * other`.
    pub fn multiply(&self, other: &Matrix4) -> Matrix4 {
        Matrix4 { m: self.m * other.m }
    }

    pub fn transpose(&self) -> Matrix4 {
        Matrix4 {
            m: self.m.transpose(),
        }
    }

    pub fn transform(&self, v: &Vector3H) -> Vector3H {
        Vector3H::from(self.m * Vector4::from(*v))
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f64 {
        (0..4).map(|c| self.m[(0, c)] * self.cofactor(0, c)).sum()
    }

    /// Inverse as the adjugate divided by the determinant.
    ///
    /// The matrix counts as singular when `|det|` is within
    /// [`SINGULAR_EPSILON`] of the product of its row lengths, the largest
    /// determinant rows of those lengths could have. Uniformly small but well
    /// shaped matrices therefore still invert.
    pub fn inverse(&self) -> Result<Matrix4, GeometryError> {
        let determinant = self.determinant();
        let bound: f64 = self.m.row_iter().map(|row| row.norm()).product();
        if !determinant.is_finite() || determinant.abs() <= SINGULAR_EPSILON * bound {
            return Err(GeometryError::SingularMatrix { determinant });
        }

        Ok(Matrix4 {
            m: nalgebra::Matrix4::from_fn(|r, c| self.cofactor(c, r) / determinant),
        })
    }

    fn cofactor(&self, row: usize, col: usize) -> f64 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col)
    }

    /// Determinant of the 3x3 matrix left after removing `row` and `col`.
    fn minor(&self, row: usize, col: usize) -> f64 {
        let rows = remaining(row);
        let cols = remaining(col);
        let e = |i: usize, j: usize| self.m[(rows[i], cols[j])];

        e(0, 0) * (e(1, 1) * e(2, 2) - e(1, 2) * e(2, 1))
            - e(0, 1) * (e(1, 0) * e(2, 2) - e(1, 2) * e(2, 0))
            + e(0, 2) * (e(1, 0) * e(2, 1) - e(1, 1) * e(2, 0))
    }

    pub fn scale(sx: f64, sy: f64, sz: f64) -> Matrix4 {
        Matrix4::from_rows([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Translation along the x, y and z parts of `v`.
    pub fn translate(v: &Vector3H) -> Matrix4 {
        Matrix4::translation(v.x, v.y, v.z)
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Matrix4 {
        Matrix4::from_rows([
            [1.0, 0.0, 0.0, dx],
            [0.0, 1.0, 0.0, dy],
            [0.0, 0.0, 1.0, dz],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the x-axis, angle in radians.
    pub fn rotate_x(angle: f64) -> Matrix4 {
        let (sin, cos) = angle.sin_cos();
        Matrix4::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos, -sin, 0.0],
            [0.0, sin, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the y-axis, angle in radians.
    pub fn rotate_y(angle: f64) -> Matrix4 {
        let (sin, cos) = angle.sin_cos();
        Matrix4::from_rows([
            [cos, 0.0, sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation about the z-axis, angle in radians.
    pub fn rotate_z(angle: f64) -> Matrix4 {
        let (sin, cos) = angle.sin_cos();
        Matrix4::from_rows([
            [cos, -sin, 0.0, 0.0],
            [sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation by `phi` radians about the line through `point` with
    /// direction `direction`.
    ///
    /// Points on the line are left where they are. Fails if `direction` has
    /// zero length, since there is no axis to rotate about.
    pub fn rotate_about_line(
        point: &Vector3H,
        direction: &Vector3H,
        phi: f64,
    ) -> Result<Matrix4, GeometryError> {
        let len = direction.length();
        if len <= 0.0 || !len.is_finite() {
            return Err(GeometryError::DegenerateAxis);
        }
        let (u, v, w) = (direction.x / len, direction.y / len, direction.z / len);
        let (a, b, c) = (point.x, point.y, point.z);

        let (u2, v2, w2) = (u * u, v * v, w * w);
        let (sin, cos) = phi.sin_cos();
        let one_minus_cos = 1.0 - cos;

        Ok(Matrix4::from_rows([
            [
                u2 + (v2 + w2) * cos,
                u * v * one_minus_cos - w * sin,
                u * w * one_minus_cos + v * sin,
                (a * (v2 + w2) - u * (b * v + c * w)) * one_minus_cos + (b * w - c * v) * sin,
            ],
            [
                u * v * one_minus_cos + w * sin,
                v2 + (u2 + w2) * cos,
                v * w * one_minus_cos - u * sin,
                (b * (u2 + w2) - v * (a * u + c * w)) * one_minus_cos + (c * u - a * w) * sin,
            ],
            [
                u * w * one_minus_cos - v * sin,
                v * w * one_minus_cos + u * sin,
                w2 + (u2 + v2) * cos,
                (c * (u2 + v2) - w * (a * u + b * v)) * one_minus_cos + (a * v - b * u) * sin,
            ],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }
}

/// The three indices of `0..4` other than `skip`.
fn remaining(skip: usize) -> [usize; 3] {
    let mut out = [0; 3];
    for (slot, i) in out.iter_mut().zip((0..4).filter(|&i| i != skip)) {
        *slot = i;
    }
    out
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<(usize, usize)> for Matrix4 {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.m[index]
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Matrix4) -> Matrix4 {
        self.multiply(&rhs)
    }
}

impl Mul for &Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Self) -> Matrix4 {
        self.multiply(rhs)
    }
}

/// Axial tilt applied before the spin, in degrees.
const SPIN_TILT_DEGREES: f64 = 23.4;

/// Continuous rotation about the model's z-axis.
///
/// The model is first tilted (a quarter turn about x, then the axial tilt
/// about y) and spun one full turn every `period_secs` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    period_secs: f64,
    tilt: Matrix4,
}

impl Spin {
    pub fn new(period_secs: f64) -> Self {
        Self {
            period_secs,
            tilt: Matrix4::rotate_x(std::f64::consts::FRAC_PI_2)
                * Matrix4::rotate_y(SPIN_TILT_DEGREES.to_radians()),
        }
    }

    pub fn period_secs(&self) -> f64 {
        self.period_secs
    }

    /// Spin angle in radians after `elapsed`, in `[0, 2π)`.
    pub fn angle_at(&self, elapsed: Duration) -> f64 {
        let phase = elapsed.as_secs_f64() % self.period_secs;
        phase / self.period_secs * std::f64::consts::TAU
    }

    pub fn matrix_at(&self, elapsed: Duration) -> Matrix4 {
        self.tilt * Matrix4::rotate_z(self.angle_at(elapsed))
    }
}

#[cfg(test)]
impl approx::AbsDiffEq for Matrix4 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}
