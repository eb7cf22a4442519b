//! # Offscreen Workspace Renderer
//!
//! Software frame production for manipulation environments: a fixed
//! perspective camera over the table, a small rasterizer for the scene
//! markers, and a [`Viewer`] resource for human-mode presentation.

pub mod camera;
pub mod error;
pub mod frame;
pub mod renderer;
pub mod viewer;

pub use camera::Camera;
pub use error::RenderError;
pub use frame::Frame;
pub use renderer::{OffscreenRenderer, SceneView};
pub use viewer::Viewer;

/// Output route for a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Return the pixel buffer to the caller.
    RgbArray,
    /// Present through the viewer resource (and return the pixels too).
    Human,
}
