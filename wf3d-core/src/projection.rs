/// Perspective projection onto a square raster
use crate::vector::{Point2, Vector3H};

/// Perspective projector for a camera at the origin looking down -z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    fov: f64,
    resolution: u32,
    half_plane: f64,
    scale: f64,
}

impl Projector {
    /// `resolution` is the raster side in pixels, `fov_degrees` the vertical
    /// field of view.
    pub fn new(resolution: u32, fov_degrees: f64) -> Self {
        let fov = fov_degrees.to_radians();
        // half the width of the projection plane at distance 1
        let half_plane = (fov / 2.0).tan();
        Self {
            fov,
            resolution,
            half_plane,
            scale: resolution as f64 / (2.0 * half_plane),
        }
    }

    /// Field of view in radians.
    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn half_plane(&self) -> f64 {
        self.half_plane
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Project a camera-space point to raster pixels.
    ///
    /// Only points in front of the camera (`z < 0`) land where expected;
    /// nothing is clipped.
    pub fn project(&self, v: &Vector3H) -> Point2 {
        Point2::new(
            (v.x / -v.z + self.half_plane) * self.scale,
            (v.y / -v.z + self.half_plane) * self.scale,
        )
    }
}
