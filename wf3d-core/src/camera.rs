/// Camera transform shared between input handling and rendering
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::transform::Matrix4;

/// Camera nudges bound to key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMove {
    Forward,
    Back,
    Left,
    Right,
    TurnLeft,
    TurnRight,
}

impl CameraMove {
    /// The transform to post-multiply onto the camera. `step` is a distance,
    /// `turn` an angle in radians.
    pub fn matrix(self, step: f64, turn: f64) -> Matrix4 {
        match self {
            CameraMove::Forward => Matrix4::translation(0.0, 0.0, -step),
            CameraMove::Back => Matrix4::translation(0.0, 0.0, step),
            CameraMove::Left => Matrix4::translation(-step, 0.0, 0.0),
            CameraMove::Right => Matrix4::translation(step, 0.0, 0.0),
            CameraMove::TurnLeft => Matrix4::rotate_y(turn),
            CameraMove::TurnRight => Matrix4::rotate_y(-turn),
        }
    }
}

/// A camera transform that one thread updates while another renders from it.
///
/// Clones share the same transform. Readers take a [`snapshot`](Self::snapshot)
/// per frame, so a frame never sees a half-applied update.
#[derive(Debug, Clone)]
pub struct SharedCamera {
    inner: Arc<Mutex<Matrix4>>,
}

impl SharedCamera {
    pub fn new(camera: Matrix4) -> Self {
        Self {
            inner: Arc::new(Mutex::new(camera)),
        }
    }

    pub fn snapshot(&self) -> Matrix4 {
        *self.lock()
    }

    /// Replace the camera with `camera * m`.
    pub fn apply(&self, m: &Matrix4) {
        let mut camera = self.lock();
        *camera = *camera * *m;
    }

    pub fn set(&self, camera: Matrix4) {
        *self.lock() = camera;
    }

    // The guarded value is a plain matrix that is only ever assigned whole,
    // so a poisoned lock still holds a usable transform.
    fn lock(&self) -> MutexGuard<'_, Matrix4> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
