//! Error types for the geometry pipeline.
//!
//! Every fatal condition is surfaced to the caller as one of these; nothing
//! in the core panics on bad geometry or a truncated mesh stream.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by matrix algebra.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The matrix has a zero (or numerically zero) determinant.
    #[error("matrix is not invertible (determinant {determinant})")]
    SingularMatrix { determinant: f64 },

    /// A rotation axis was given with a zero-length direction vector.
    #[error("cannot rotate about a direction vector of length zero")]
    DegenerateAxis,
}

/// Errors raised while reading an ASCII mesh stream.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("failed to open mesh file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read mesh stream: {0}")]
    Io(#[from] io::Error),

    /// The stream ended after one or two vertices of a triangle.
    #[error("incomplete triangle in mesh stream: {found} of 3 vertices before end of input at line {line}")]
    IncompleteTriangle { found: usize, line: usize },
}

/// Errors raised when validating a [`ViewerConfig`](crate::config::ViewerConfig).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("raster resolution must be positive")]
    Resolution,

    #[error("field of view must lie strictly between 0 and 180 degrees, got {0}")]
    FieldOfView(f64),

    #[error("rotation period must be a positive number of seconds, got {0}")]
    RotationPeriod(f64),

    #[error("camera transform is not invertible: {0}")]
    SingularCamera(#[source] GeometryError),
}
