//! torus-rain
//!
//! A small wgpu/winit scene: the extruded text "Work in Progress" lit by an
//! ambient and a red point light, a hundred tori falling and spinning around
//! it, an orbit camera and an imgui panel for the light intensities.
//!
//! ```no_run
//! use torus_rain::{SceneApp, SceneConfig};
//!
//! let app = SceneApp::new(SceneConfig::from_env().with_instance_count(50))?;
//! app.run()?;
//! # Ok::<(), torus_rain::SceneError>(())
//! ```

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod frame;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::SceneApp;
pub use config::SceneConfig;
pub use error::{Result, SceneError};

/// Opens the window with the default configuration and runs until it is closed
///
/// The asset root can be moved with the `TORUS_RAIN_ASSETS` environment variable.
pub fn run() -> Result<()> {
    SceneApp::new(SceneConfig::from_env())?.run()
}
