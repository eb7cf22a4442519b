//! # Scene Description Model
//!
//! Serde document describing a tabletop manipulation scene: the table slab,
//! rigid bodies, scalar joints, named sites and mocap targets. A [`Model`] is
//! loaded from a named asset file resolved against an asset root directory
//! and handed to [`MocapSim::from_model`](crate::MocapSim::from_model).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimError;

fn default_timestep() -> f32 {
    0.002
}

fn default_half_size() -> f32 {
    0.025
}

fn zero_vec() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn identity_quat() -> [f32; 4] {
    [1.0, 0.0, 0.0, 0.0]
}

fn unbounded_range() -> [f32; 2] {
    [f32::NEG_INFINITY, f32::INFINITY]
}

/// Complete scene description.
#[derive(Debug, Clone, Deserialize)]
pub struct Model {
    pub name: String,
    /// Duration of one physics substep in seconds.
    #[serde(default = "default_timestep")]
    pub timestep: f32,
    pub table: Table,
    #[serde(default)]
    pub bodies: Vec<BodyDef>,
    #[serde(default)]
    pub joints: Vec<JointDef>,
    #[serde(default)]
    pub sites: Vec<SiteDef>,
    #[serde(default)]
    pub mocaps: Vec<MocapDef>,
    /// Optional grasp coupling between the gripper and a free body.
    #[serde(default)]
    pub grasp: Option<GraspDef>,
}

/// Table slab the workspace is anchored to.
#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    pub center: [f32; 3],
    pub half_extents: [f32; 3],
}

impl Table {
    /// World-space height of the table surface.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.center[2] + self.half_extents[2]
    }
}

/// How a body's translation is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    /// Falls under gravity and rests on the table.
    #[default]
    Free,
    /// Tracks the welded mocap target; gravity does not apply.
    MocapDriven,
}

/// Rigid body contributing three translational `qpos` slots.
#[derive(Debug, Clone, Deserialize)]
pub struct BodyDef {
    pub name: String,
    pub pos: [f32; 3],
    #[serde(default)]
    pub kind: BodyKind,
    /// Contact extent used when resting on the table.
    #[serde(default = "default_half_size")]
    pub half_size: f32,
}

/// Scalar joint contributing one `qpos`/`qvel`/`ctrl` slot.
#[derive(Debug, Clone, Deserialize)]
pub struct JointDef {
    pub name: String,
    #[serde(default)]
    pub init: f32,
    #[serde(default = "unbounded_range")]
    pub range: [f32; 2],
}

/// Named reference point attached to a body.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteDef {
    pub name: String,
    pub body: String,
    #[serde(default = "zero_vec")]
    pub offset: [f32; 3],
}

/// Motion-capture target welded to a body.
#[derive(Debug, Clone, Deserialize)]
pub struct MocapDef {
    pub name: String,
    pub body: String,
    pub pos: [f32; 3],
    #[serde(default = "identity_quat")]
    pub quat: [f32; 4],
}

/// Grasp coupling: when the listed joints close past `close_threshold` while
/// the grasp site is within `radius` of the object body, the object follows
/// the end-effector.
#[derive(Debug, Clone, Deserialize)]
pub struct GraspDef {
    pub site: String,
    pub object: String,
    pub joints: Vec<String>,
    pub close_threshold: f32,
    pub radius: f32,
}

impl Model {
    /// Parse a scene description from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Load `<asset_root>/<name>.json`.
    pub fn load(asset_root: &Path, name: &str) -> Result<Self, SimError> {
        let path = asset_root.join(format!("{name}.json"));
        let json = fs::read_to_string(&path).map_err(|source| SimError::Asset {
            path: path.clone(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check that sites and mocaps reference bodies that exist.
    fn validate(&self) -> Result<(), SimError> {
        let body_defined = |name: &str| self.bodies.iter().any(|b| b.name == name);
        for site in &self.sites {
            if !body_defined(&site.body) {
                return Err(SimError::DanglingBody {
                    scene: self.name.clone(),
                    body: site.body.clone(),
                });
            }
        }
        for mocap in &self.mocaps {
            if !body_defined(&mocap.body) {
                return Err(SimError::DanglingBody {
                    scene: self.name.clone(),
                    body: mocap.body.clone(),
                });
            }
        }
        if let Some(grasp) = &self.grasp {
            if !body_defined(&grasp.object) {
                return Err(SimError::DanglingBody {
                    scene: self.name.clone(),
                    body: grasp.object.clone(),
                });
            }
        }
        Ok(())
    }
}
