//! Environment error types.

use render::RenderError;
use sim::SimError;

/// Errors surfaced by the environment adapter.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// The action had the wrong arity or a component outside the action
    /// space. Fatal to the current call; the caller must supply a conforming
    /// action.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// A named scene entity the adapter needs was missing.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Frame production failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
