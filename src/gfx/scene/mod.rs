//! # Scene Management Module
//!
//! Holds everything that is drawn: objects with their instance transforms,
//! the two lights, the shared materials and the orbit camera.
//!
//! ## Key Components
//!
//! - [`Scene`] - Container for objects, lights, materials and camera
//! - [`Object`] - A mesh drawn once per [`Transform`] instance
//! - [`Viewport`] - Logical window size and capped pixel ratio
//! - [`Vertex3D`] / [`InstanceRaw`] - GPU vertex formats

pub mod light;
pub mod object;
pub mod scene;
pub mod vertex;
pub mod viewport;

// Re-export main types
pub use light::{AmbientLight, PointLight};
pub use object::{DrawObject, Mesh, Object, ObjectKind, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::{InstanceRaw, Vertex3D};
pub use viewport::Viewport;
