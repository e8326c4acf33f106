//! # Configuration
//!
//! Defaults and tolerances for the pipeline, and [`ViewerConfig`], the
//! validated set of values a front end needs to build a frame.

use crate::error::ConfigError;
use crate::projection::Projector;
use crate::transform::{Matrix4, Spin};

/// A matrix is treated as singular when `|det|` is at or below this fraction
/// of the product of its row lengths.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Raster side in pixels.
pub const DEFAULT_RESOLUTION: u32 = 600;

/// Vertical field of view in degrees.
pub const DEFAULT_FOV_DEGREES: f64 = 52.0;

/// Seconds per full turn of the model.
pub const DEFAULT_ROTATION_PERIOD_SECS: f64 = 30.0;

/// Distance of the initial camera from the origin along +z.
pub const DEFAULT_CAMERA_DISTANCE: f64 = 2.0;

/// Camera translation per key press.
pub const CAMERA_STEP: f64 = 0.25;

/// Camera turn per key press, in degrees.
pub const CAMERA_TURN_DEGREES: f64 = 1.0;

/// Settings consumed by the projector, the spin and the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    pub resolution: u32,
    pub fov_degrees: f64,
    pub rotation_period_secs: f64,
    pub camera: Matrix4,
}

impl ViewerConfig {
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_fov_degrees(mut self, fov_degrees: f64) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    pub fn with_rotation_period(mut self, secs: f64) -> Self {
        self.rotation_period_secs = secs;
        self
    }

    pub fn with_camera(mut self, camera: Matrix4) -> Self {
        self.camera = camera;
        self
    }

    /// Check every value against the range the pipeline accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 {
            return Err(ConfigError::Resolution);
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_degrees));
        }
        if !(self.rotation_period_secs.is_finite() && self.rotation_period_secs > 0.0) {
            return Err(ConfigError::RotationPeriod(self.rotation_period_secs));
        }
        self.camera.inverse().map_err(ConfigError::SingularCamera)?;
        Ok(())
    }

    pub fn projector(&self) -> Result<Projector, ConfigError> {
        self.validate()?;
        Ok(Projector::new(self.resolution, self.fov_degrees))
    }

    pub fn spin(&self) -> Result<Spin, ConfigError> {
        self.validate()?;
        Ok(Spin::new(self.rotation_period_secs))
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            fov_degrees: DEFAULT_FOV_DEGREES,
            rotation_period_secs: DEFAULT_ROTATION_PERIOD_SECS,
            camera: Matrix4::translation(0.0, 0.0, DEFAULT_CAMERA_DISTANCE),
        }
    }
}
