//! Viewer resource for human-mode rendering.

use tracing::debug;

use crate::error::RenderError;
use crate::frame::Frame;
use crate::renderer::{OffscreenRenderer, SceneView};

/// Lazily-acquired presentation resource.
///
/// Holds its own renderer and the last presented frame. Environments create
/// one on the first human-mode render call and must release it through their
/// `close` path; dropping the viewer releases everything it holds.
pub struct Viewer {
    renderer: OffscreenRenderer,
    last_frame: Option<Frame>,
}

impl Viewer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        debug!(width, height, "opening viewer");
        Self {
            renderer: OffscreenRenderer::new(width, height),
            last_frame: None,
        }
    }

    /// Render and present one frame at the given dimensions.
    pub fn show(
        &mut self,
        view: &SceneView,
        width: u32,
        height: u32,
    ) -> Result<Frame, RenderError> {
        self.renderer.set_dimensions(width, height);
        let frame = self.renderer.render(view)?;
        self.last_frame = Some(frame.clone());
        Ok(frame)
    }

    /// The most recently presented frame, if any.
    #[must_use]
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        debug!("closing viewer");
    }
}
