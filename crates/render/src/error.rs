//! Renderer error types.

/// Errors surfaced by frame production and encoding.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Requested frame dimensions were zero.
    #[error("frame dimensions must be non-zero")]
    EmptyFrame,

    /// PNG encoding failed.
    #[error("failed to encode frame")]
    Encode(#[from] image::ImageError),
}
