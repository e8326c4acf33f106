/// Triangles and triangle meshes
use std::f64::consts::{FRAC_PI_2, PI};

use log::debug;

use crate::transform::Matrix4;
use crate::vector::Vector3H;

/// A triangle defined by three ordered vertices.
///
/// The vertex order is the winding and decides which way [`Triangle::normal`]
/// points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vector3H; 3],
}

impl Triangle {
    pub fn new(v1: Vector3H, v2: Vector3H, v3: Vector3H) -> Self {
        Self {
            vertices: [v1, v2, v3],
        }
    }

    pub fn from_points(points: [[f64; 3]; 3]) -> Self {
        let [a, b, c] = points.map(|[x, y, z]| Vector3H::new(x, y, z));
        Self::new(a, b, c)
    }

    pub fn apply(&self, m: &Matrix4) -> Triangle {
        Triangle {
            vertices: self.vertices.map(|v| v.transform(m)),
        }
    }

    /// Face normal, not normalized.
    ///
    /// Counter-clockwise winding, seen from the side the normal points to,
    /// gives a normal towards the viewer; clockwise winding flips it. A
    /// degenerate triangle has a zero-length normal.
    pub fn normal(&self) -> Vector3H {
        let [v1, v2, v3] = self.vertices;
        (v2 - v1).cross(&(v3 - v1))
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// A new mesh holding this mesh's triangles followed by those of each of
    /// `others`, in order.
    pub fn merge(&self, others: &[Mesh]) -> Mesh {
        let total = self.len() + others.iter().map(Mesh::len).sum::<usize>();
        let mut merged = Mesh::with_capacity(total);
        merged.triangles.extend_from_slice(&self.triangles);
        for other in others {
            merged.triangles.extend_from_slice(&other.triangles);
        }
        merged
    }

    pub fn apply(&self, m: &Matrix4) -> Mesh {
        Mesh {
            triangles: self.triangles.iter().map(|t| t.apply(m)).collect(),
        }
    }

    pub fn moved(&self, dx: f64, dy: f64, dz: f64) -> Mesh {
        self.apply(&Matrix4::translation(dx, dy, dz))
    }

    /// Rotate about the x, y and z axes (radians). The z rotation is applied
    /// first and the x rotation last.
    pub fn rotated(&self, ax: f64, ay: f64, az: f64) -> Mesh {
        self.apply(&(Matrix4::rotate_x(ax) * (Matrix4::rotate_y(ay) * Matrix4::rotate_z(az))))
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vector3H, Vector3H)> {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = *vertices.next()?;
        Some(vertices.fold((first, first), |(min, max), v| (min.min(v), max.max(v))))
    }

    /// Center the bounding box on the origin and scale uniformly so its
    /// longest edge is 1.
    ///
    /// A mesh whose vertices all coincide is only centered.
    pub fn fit_unit_box(&self) -> Mesh {
        let Some((min, max)) = self.bounds() else {
            return self.clone();
        };

        let centered = self.moved(
            -(min.x + max.x) / 2.0,
            -(min.y + max.y) / 2.0,
            -(min.z + max.z) / 2.0,
        );

        let extent = (max.x - min.x).max(max.y - min.y).max(max.z - min.z);
        if extent > 0.0 {
            let factor = 1.0 / extent;
            debug!("scaling mesh by {factor} to fit the unit box");
            centered.apply(&Matrix4::scale(factor, factor, factor))
        } else {
            centered
        }
    }

    /// A unit cube centered on the origin with outward facing triangles.
    ///
    /// Built from the two counter-clockwise triangles of the top face and
    /// rotated copies of them.
    pub fn cube() -> Self {
        let top = Mesh {
            triangles: vec![
                Triangle::from_points([[0.5, 0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, -0.5, 0.5]]),
                Triangle::from_points([[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5]]),
            ],
        };

        top.merge(&[
            top.rotated(PI, 0.0, 0.0),        // bottom
            top.rotated(FRAC_PI_2, 0.0, 0.0), // north
            top.rotated(-FRAC_PI_2, 0.0, 0.0), // south
            top.rotated(0.0, FRAC_PI_2, 0.0), // west
            top.rotated(0.0, -FRAC_PI_2, 0.0), // east
        ])
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
