//! Error type shared by the whole crate

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while booting, loading assets, or drawing
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create drawing surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface has no supported texture format")]
    UnsupportedSurface,

    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("failed to read font {path}: {source}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse font {path}: {source}")]
    FontParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed outline for glyph '{glyph}': {reason}")]
    Outline { glyph: char, reason: String },

    #[error("font load was dropped before completing")]
    FontLoadCancelled,

    #[error("debug panel failed to render: {0}")]
    Ui(String),
}

pub type Result<T, E = SceneError> = std::result::Result<T, E>;
