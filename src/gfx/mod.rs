//! # Graphics Module
//!
//! Everything between the scene description and the pixels on screen.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Damped orbit camera and its input controller
//! - **Geometry** ([`geometry`]) - Torus and extruded text meshes
//! - **Rendering Pipeline** ([`rendering`]) - Surface, depth buffer and the instanced scene pipeline
//! - **Resource Management** ([`resources`]) - Global and material uniforms
//! - **Scene Management** ([`scene`]) - Objects, instance transforms, lights and viewport
//! - **UI** ([`ui`]) - imgui overlay and the light panel
//!
//! ## Usage
//!
//! The graphics system is driven by the app through [`RenderEngine`] and [`Scene`]:
//!
//! ```no_run
//! use torus_rain::gfx::{camera::CameraManager, scene::Scene};
//!
//! let mut scene = Scene::new(CameraManager::scene_default(1200.0 / 800.0));
//! scene.update();
//! ```
//!
//! [`RenderEngine`]: rendering::RenderEngine
//! [`Scene`]: scene::Scene

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod ui;
