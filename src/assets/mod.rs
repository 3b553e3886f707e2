//! Asset loading
//!
//! Typeface parsing lives in [`font`]; [`loader`] runs the load off the
//! render thread and turns a loaded font into scene objects.

pub mod font;
pub mod loader;

pub use font::Font;
pub use loader::{populate_scene, FontLoader, PendingFont};
