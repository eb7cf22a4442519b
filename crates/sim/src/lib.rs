#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Manipulation Simulation Core
//!
//! A small CPU simulation layer for tabletop manipulation scenes. It owns the
//! mutable state buffers (`qpos`, `qvel`, time) for a scene described by a
//! [`Model`], exposes named lookups for sites, joints and mocap bodies, and
//! advances the scene one substep at a time.
//!
//! The engine is deliberately modest: the arm end-effector is driven by a
//! motion-capture target through a rate-limited weld, gripper joints are
//! servoed toward their commanded apertures, and free bodies fall under
//! gravity until they rest on the table. Contact resolution beyond the table
//! surface and full joint dynamics are out of scope; higher layers treat this
//! crate as the physics collaborator behind a narrow accessor interface.
//!
//! ## Key Components
//!
//! -   **Scene description:** [`Model`] in the [`model`] module, a serde
//!     document listing bodies, scalar joints, sites and mocap targets.
//! -   **Simulation:** [`MocapSim`] in the [`simulation`] module owns the
//!     [`Data`] buffers and implements `forward`/`step`/reset.
//! -   **Mocap actuation:** the [`mocap`] module applies the concatenated
//!     control vector built by the environment layer.

pub mod error;
pub mod mocap;
pub mod model;
pub mod simulation;
pub mod types;

pub use error::SimError;
pub use model::{BodyDef, BodyKind, GraspDef, JointDef, Model, MocapDef, SiteDef, Table};
pub use simulation::{BodyId, Data, JointId, MocapId, MocapSim, SiteId};
pub use types::{Quat, Vec3};
