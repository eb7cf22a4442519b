//! Simulation error types.

use std::path::PathBuf;

/// Errors surfaced by scene loading and named lookups.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A site name was not present in the scene description.
    #[error("unknown site `{0}`")]
    UnknownSite(String),

    /// A joint name was not present in the scene description.
    #[error("unknown joint `{0}`")]
    UnknownJoint(String),

    /// A mocap body name was not present in the scene description.
    #[error("unknown mocap body `{0}`")]
    UnknownMocap(String),

    /// A body name was not present in the scene description.
    #[error("unknown body `{0}`")]
    UnknownBody(String),

    /// The scene description references an entity it never defines.
    #[error("scene `{scene}` references undefined body `{body}`")]
    DanglingBody { scene: String, body: String },

    /// Reading the scene description file failed.
    #[error("failed to read scene description `{path}`")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parsing the scene description failed.
    #[error("failed to parse scene description")]
    Parse(#[from] serde_json::Error),
}
