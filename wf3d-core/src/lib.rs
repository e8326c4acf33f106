/// WF3D Core Library - Wireframe geometry pipeline
///
/// This library provides the stateless core of the renderer: homogeneous
/// vector and matrix algebra, triangle meshes, ASCII STL parsing, perspective
/// projection and the per-frame transform, cull and project sequence.

pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod projection;
pub mod stl;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use camera::{CameraMove, SharedCamera};
pub use config::ViewerConfig;
pub use error::{ConfigError, GeometryError, MeshError};
pub use geometry::{Mesh, Triangle};
pub use pipeline::{is_front_facing, render_frame, Polyline};
pub use projection::Projector;
pub use stl::{load_mesh, MeshReader};
pub use transform::{Matrix4, Spin};
pub use vector::{Point2, Vector3H};
