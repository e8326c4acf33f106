/// Per-frame transform, cull and project
use log::trace;

use crate::error::GeometryError;
use crate::geometry::{Mesh, Triangle};
use crate::projection::Projector;
use crate::transform::Matrix4;
use crate::vector::Point2;

/// The projected outline of one triangle: a closed loop through its three
/// vertices, in raster pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polyline {
    pub points: [Point2; 3],
}

impl Polyline {
    /// The three segments v1→v2, v2→v3 and v3→v1.
    pub fn segments(&self) -> [(Point2, Point2); 3] {
        let [a, b, c] = self.points;
        [(a, b), (b, c), (c, a)]
    }
}

/// Back-face test for a triangle in camera space.
///
/// Compares the normal with the direction from the camera at the origin to
/// the first vertex.
pub fn is_front_facing(triangle: &Triangle) -> bool {
    triangle.vertices[0].dot(&triangle.normal()) < 0.0
}

/// Render one wireframe frame.
///
/// The mesh is moved by `model`, then brought into camera space with the
/// inverse of `camera`. Every triangle facing the camera is projected to a
/// closed polyline; the output follows mesh order. Fails only when `camera`
/// cannot be inverted.
pub fn render_frame(
    mesh: &Mesh,
    model: &Matrix4,
    camera: &Matrix4,
    projector: &Projector,
) -> Result<Vec<Polyline>, GeometryError> {
    let view = camera.inverse()?;
    let world = mesh.apply(model).apply(&view);

    let polylines: Vec<Polyline> = world
        .triangles
        .iter()
        .filter(|t| is_front_facing(t))
        .map(|t| Polyline {
            points: t.vertices.map(|v| projector.project(&v)),
        })
        .collect();

    trace!("frame: {} of {} triangles visible", polylines.len(), mesh.len());
    Ok(polylines)
}
