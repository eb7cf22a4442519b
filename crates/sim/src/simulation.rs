//! # Simulation State and Stepping
//!
//! [`MocapSim`] owns the mutable buffers for one scene and advances them one
//! substep at a time. The arm end-effector is welded to its mocap target and
//! tracks it with a rate limit, scalar joints servo toward their commanded
//! values, and free bodies integrate under gravity until they rest on the
//! table slab.

use std::collections::HashMap;

use tracing::debug;

use crate::error::SimError;
use crate::model::{BodyKind, Model};
use crate::types::{Quat, Vec3};

/// Maximum end-effector travel per substep, in meters.
const EEF_RATE: f32 = 0.05;

/// Gripper joint servo speed, in radians per second.
const GRIP_RATE: f32 = 8.0;

/// Gravitational acceleration along -z, in m/s^2.
const GRAVITY: f32 = 9.81;

/// Handle to a body resolved by name at construction time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BodyId(usize);

/// Handle to a scalar joint resolved by name at construction time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct JointId(usize);

/// Handle to a site resolved by name at construction time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SiteId(usize);

/// Handle to a mocap target resolved by name at construction time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MocapId(usize);

/// Mutable simulation buffers.
///
/// Bodies occupy three `qpos`/`qvel` slots each (translation), followed by
/// one slot per scalar joint. `ctrl` holds the commanded target for each
/// scalar joint.
#[derive(Debug, Clone)]
pub struct Data {
    pub time: f32,
    pub qpos: Vec<f32>,
    pub qvel: Vec<f32>,
    pub ctrl: Vec<f32>,
    pub mocap_pos: Vec<Vec3>,
    pub mocap_quat: Vec<Quat>,
    site_xpos: Vec<Vec3>,
}

#[derive(Copy, Clone)]
struct BodySlot {
    qpos: usize,
    kind: BodyKind,
    half_size: f32,
    /// Welded mocap index, for mocap-driven bodies.
    weld: Option<usize>,
}

#[derive(Copy, Clone)]
struct JointSlot {
    qpos: usize,
    range: [f32; 2],
}

#[derive(Copy, Clone)]
struct SiteSlot {
    body: usize,
    offset: Vec3,
}

#[derive(Copy, Clone)]
struct MocapSlot {
    body: usize,
}

#[derive(Clone)]
struct GraspSlot {
    site: usize,
    object: usize,
    joints: Vec<usize>,
    close_threshold: f32,
    radius: f32,
}

#[derive(Clone)]
struct Snapshot {
    time: f32,
    qpos: Vec<f32>,
    qvel: Vec<f32>,
    ctrl: Vec<f32>,
    mocap_pos: Vec<Vec3>,
    mocap_quat: Vec<Quat>,
}

/// Simulation for one mocap-driven manipulation scene.
pub struct MocapSim {
    model: Model,
    data: Data,
    bodies: Vec<BodySlot>,
    body_index: HashMap<String, usize>,
    joints: Vec<JointSlot>,
    joint_index: HashMap<String, usize>,
    sites: Vec<SiteSlot>,
    site_index: HashMap<String, usize>,
    mocaps: Vec<MocapSlot>,
    mocap_index: HashMap<String, usize>,
    grasp: Option<GraspSlot>,
    attached: bool,
    initial: Snapshot,
}

impl MocapSim {
    /// Build a simulation from a scene description.
    ///
    /// Resolves every cross-reference up front so stepping and the handle
    /// based accessors never fail afterwards.
    pub fn from_model(model: Model) -> Result<Self, SimError> {
        let mut body_index = HashMap::new();
        let mut bodies = Vec::with_capacity(model.bodies.len());
        for (i, def) in model.bodies.iter().enumerate() {
            body_index.insert(def.name.clone(), i);
            bodies.push(BodySlot {
                qpos: i * 3,
                kind: def.kind,
                half_size: def.half_size,
                weld: None,
            });
        }

        let joint_base = bodies.len() * 3;
        let mut joint_index = HashMap::new();
        let mut joints = Vec::with_capacity(model.joints.len());
        for (i, def) in model.joints.iter().enumerate() {
            joint_index.insert(def.name.clone(), i);
            joints.push(JointSlot {
                qpos: joint_base + i,
                range: def.range,
            });
        }

        let mut site_index = HashMap::new();
        let mut sites = Vec::with_capacity(model.sites.len());
        for (i, def) in model.sites.iter().enumerate() {
            let body = *body_index
                .get(&def.body)
                .ok_or_else(|| SimError::UnknownBody(def.body.clone()))?;
            site_index.insert(def.name.clone(), i);
            sites.push(SiteSlot {
                body,
                offset: Vec3::from_array(def.offset),
            });
        }

        let mut mocap_index = HashMap::new();
        let mut mocaps = Vec::with_capacity(model.mocaps.len());
        for (i, def) in model.mocaps.iter().enumerate() {
            let body = *body_index
                .get(&def.body)
                .ok_or_else(|| SimError::UnknownBody(def.body.clone()))?;
            mocap_index.insert(def.name.clone(), i);
            mocaps.push(MocapSlot { body });
            bodies[body].weld = Some(i);
        }

        let grasp = match &model.grasp {
            Some(def) => {
                let site = *site_index
                    .get(&def.site)
                    .ok_or_else(|| SimError::UnknownSite(def.site.clone()))?;
                let object = *body_index
                    .get(&def.object)
                    .ok_or_else(|| SimError::UnknownBody(def.object.clone()))?;
                let mut grasp_joints = Vec::with_capacity(def.joints.len());
                for name in &def.joints {
                    let j = *joint_index
                        .get(name)
                        .ok_or_else(|| SimError::UnknownJoint(name.clone()))?;
                    grasp_joints.push(j);
                }
                Some(GraspSlot {
                    site,
                    object,
                    joints: grasp_joints,
                    close_threshold: def.close_threshold,
                    radius: def.radius,
                })
            }
            None => None,
        };

        let mut qpos = vec![0.0; joint_base + joints.len()];
        for (slot, def) in bodies.iter().zip(&model.bodies) {
            qpos[slot.qpos..slot.qpos + 3].copy_from_slice(&def.pos);
        }
        for (slot, def) in joints.iter().zip(&model.joints) {
            qpos[slot.qpos] = def.init;
        }

        let data = Data {
            time: 0.0,
            qvel: vec![0.0; qpos.len()],
            ctrl: model.joints.iter().map(|j| j.init).collect(),
            mocap_pos: model.mocaps.iter().map(|m| Vec3::from_array(m.pos)).collect(),
            mocap_quat: model.mocaps.iter().map(|m| Quat::from_array(m.quat)).collect(),
            site_xpos: vec![Vec3::ZERO; sites.len()],
            qpos,
        };

        let initial = Snapshot {
            time: data.time,
            qpos: data.qpos.clone(),
            qvel: data.qvel.clone(),
            ctrl: data.ctrl.clone(),
            mocap_pos: data.mocap_pos.clone(),
            mocap_quat: data.mocap_quat.clone(),
        };

        let mut sim = Self {
            model,
            data,
            bodies,
            body_index,
            joints,
            joint_index,
            sites,
            site_index,
            mocaps,
            mocap_index,
            grasp,
            attached: false,
            initial,
        };
        sim.forward();
        Ok(sim)
    }

    /// Scene description this simulation was built from.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Read-only view of the state buffers.
    #[must_use]
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Duration of one substep in seconds.
    #[must_use]
    pub fn timestep(&self) -> f32 {
        self.model.timestep
    }

    /// Simulated time since the last reset.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.data.time
    }

    /// Whether the grasp coupling currently holds the object.
    #[must_use]
    pub fn grasped(&self) -> bool {
        self.attached
    }

    pub fn body_id(&self, name: &str) -> Result<BodyId, SimError> {
        self.body_index
            .get(name)
            .copied()
            .map(BodyId)
            .ok_or_else(|| SimError::UnknownBody(name.to_owned()))
    }

    pub fn joint_id(&self, name: &str) -> Result<JointId, SimError> {
        self.joint_index
            .get(name)
            .copied()
            .map(JointId)
            .ok_or_else(|| SimError::UnknownJoint(name.to_owned()))
    }

    pub fn site_id(&self, name: &str) -> Result<SiteId, SimError> {
        self.site_index
            .get(name)
            .copied()
            .map(SiteId)
            .ok_or_else(|| SimError::UnknownSite(name.to_owned()))
    }

    pub fn mocap_id(&self, name: &str) -> Result<MocapId, SimError> {
        self.mocap_index
            .get(name)
            .copied()
            .map(MocapId)
            .ok_or_else(|| SimError::UnknownMocap(name.to_owned()))
    }

    /// Cached world position of a site. Refreshed by [`forward`](Self::forward).
    #[must_use]
    pub fn site_position(&self, site: SiteId) -> Vec3 {
        self.data.site_xpos[site.0]
    }

    /// Named-lookup variant of [`site_position`](Self::site_position).
    pub fn site_position_by_name(&self, name: &str) -> Result<Vec3, SimError> {
        Ok(self.site_position(self.site_id(name)?))
    }

    #[must_use]
    pub fn body_position(&self, body: BodyId) -> Vec3 {
        self.read_body(body.0)
    }

    pub fn set_body_position(&mut self, body: BodyId, pos: Vec3) {
        self.write_body(body.0, pos);
    }

    #[must_use]
    pub fn joint_position(&self, joint: JointId) -> f32 {
        self.data.qpos[self.joints[joint.0].qpos]
    }

    /// Named-lookup variant of [`joint_position`](Self::joint_position).
    pub fn joint_position_by_name(&self, name: &str) -> Result<f32, SimError> {
        Ok(self.joint_position(self.joint_id(name)?))
    }

    pub fn set_joint_position(&mut self, joint: JointId, value: f32) {
        let slot = self.joints[joint.0];
        self.data.qpos[slot.qpos] = value.clamp(slot.range[0], slot.range[1]);
    }

    pub fn set_joint_position_by_name(&mut self, name: &str, value: f32) -> Result<(), SimError> {
        let joint = self.joint_id(name)?;
        self.set_joint_position(joint, value);
        Ok(())
    }

    /// Commanded servo target for a scalar joint.
    pub fn set_ctrl(&mut self, joint: JointId, value: f32) {
        let slot = self.joints[joint.0];
        self.data.ctrl[joint.0] = value.clamp(slot.range[0], slot.range[1]);
    }

    #[must_use]
    pub fn mocap_position(&self, mocap: MocapId) -> Vec3 {
        self.data.mocap_pos[mocap.0]
    }

    pub fn set_mocap_position(&mut self, mocap: MocapId, pos: Vec3) {
        self.data.mocap_pos[mocap.0] = pos;
    }

    #[must_use]
    pub fn mocap_quat(&self, mocap: MocapId) -> Quat {
        self.data.mocap_quat[mocap.0]
    }

    pub fn set_mocap_quat(&mut self, mocap: MocapId, quat: Quat) {
        self.data.mocap_quat[mocap.0] = quat;
    }

    /// Body the mocap target is welded to.
    #[must_use]
    pub fn mocap_body(&self, mocap: MocapId) -> BodyId {
        BodyId(self.mocaps[mocap.0].body)
    }

    /// Forward-kinematics recomputation: refresh cached site world positions
    /// from the current `qpos`. Does not advance time.
    pub fn forward(&mut self) {
        for i in 0..self.sites.len() {
            self.data.site_xpos[i] = self.compute_site(i);
        }
    }

    /// Advance the scene by one substep.
    pub fn step(&mut self) {
        let dt = self.model.timestep;

        // Mocap-driven bodies track their welded target, rate limited.
        for i in 0..self.bodies.len() {
            let slot = self.bodies[i];
            if slot.kind != BodyKind::MocapDriven {
                continue;
            }
            let Some(weld) = slot.weld else { continue };
            let pos = self.read_body(i);
            let applied = (self.data.mocap_pos[weld] - pos).clamp_abs(EEF_RATE);
            self.write_body(i, pos + applied);
            self.write_body_vel(i, applied * (1.0 / dt));
        }

        // Scalar joints servo toward their commanded targets.
        let max_travel = GRIP_RATE * dt;
        for i in 0..self.joints.len() {
            let slot = self.joints[i];
            let q = self.data.qpos[slot.qpos];
            let applied = (self.data.ctrl[i] - q).clamp(-max_travel, max_travel);
            self.data.qpos[slot.qpos] = (q + applied).clamp(slot.range[0], slot.range[1]);
            self.data.qvel[slot.qpos] = applied / dt;
        }

        self.update_grasp();

        // Free bodies: held objects follow the grasp site, everything else
        // falls until it rests on the table surface.
        let table_top = self.model.table.top();
        let held = self.grasp.as_ref().filter(|_| self.attached).cloned();
        for i in 0..self.bodies.len() {
            let slot = self.bodies[i];
            if slot.kind != BodyKind::Free {
                continue;
            }
            if let Some(grasp) = held.as_ref().filter(|g| g.object == i) {
                let target = self.compute_site(grasp.site);
                let pos = self.read_body(i);
                self.write_body(i, target);
                self.write_body_vel(i, (target - pos) * (1.0 / dt));
                continue;
            }
            let mut pos = self.read_body(i);
            let mut vel = self.read_body_vel(i);
            vel.z -= GRAVITY * dt;
            pos += vel * dt;
            let rest = table_top + slot.half_size;
            if pos.z < rest {
                pos.z = rest;
                vel = Vec3::ZERO;
            }
            self.write_body(i, pos);
            self.write_body_vel(i, vel);
        }

        self.forward();
        self.data.time += dt;
    }

    /// Restore `qpos`, `qvel`, time and the mocap buffers to the initial
    /// snapshot and drop any held grasp.
    pub fn reset_data(&mut self) {
        self.data.time = self.initial.time;
        self.data.qpos.copy_from_slice(&self.initial.qpos);
        self.data.qvel.copy_from_slice(&self.initial.qvel);
        self.data.ctrl.copy_from_slice(&self.initial.ctrl);
        self.data.mocap_pos.copy_from_slice(&self.initial.mocap_pos);
        self.data.mocap_quat.copy_from_slice(&self.initial.mocap_quat);
        self.attached = false;
        self.forward();
    }

    /// Re-record the initial snapshot from the current buffers.
    ///
    /// Called once after scene setup so later resets restore the configured
    /// state rather than the raw model values.
    pub fn save_initial_state(&mut self) {
        self.initial = Snapshot {
            time: self.data.time,
            qpos: self.data.qpos.clone(),
            qvel: self.data.qvel.clone(),
            ctrl: self.data.ctrl.clone(),
            mocap_pos: self.data.mocap_pos.clone(),
            mocap_quat: self.data.mocap_quat.clone(),
        };
    }

    fn update_grasp(&mut self) {
        let Some(grasp) = self.grasp.clone() else {
            return;
        };
        let closed = grasp
            .joints
            .iter()
            .all(|&j| self.data.qpos[self.joints[j].qpos] >= grasp.close_threshold);
        if self.attached {
            if !closed {
                self.attached = false;
                debug!(time = self.data.time, "grasp released");
            }
            return;
        }
        let site = self.compute_site(grasp.site);
        let object = self.read_body(grasp.object);
        if closed && site.distance(object) <= grasp.radius {
            self.attached = true;
            debug!(time = self.data.time, "grasp engaged");
        }
    }

    fn compute_site(&self, site: usize) -> Vec3 {
        let slot = self.sites[site];
        self.read_body(slot.body) + slot.offset
    }

    fn read_body(&self, body: usize) -> Vec3 {
        let o = self.bodies[body].qpos;
        Vec3::new(self.data.qpos[o], self.data.qpos[o + 1], self.data.qpos[o + 2])
    }

    fn write_body(&mut self, body: usize, pos: Vec3) {
        let o = self.bodies[body].qpos;
        self.data.qpos[o] = pos.x;
        self.data.qpos[o + 1] = pos.y;
        self.data.qpos[o + 2] = pos.z;
    }

    fn read_body_vel(&self, body: usize) -> Vec3 {
        let o = self.bodies[body].qpos;
        Vec3::new(self.data.qvel[o], self.data.qvel[o + 1], self.data.qvel[o + 2])
    }

    fn write_body_vel(&mut self, body: usize, vel: Vec3) {
        let o = self.bodies[body].qpos;
        self.data.qvel[o] = vel.x;
        self.data.qvel[o + 1] = vel.y;
        self.data.qvel[o + 2] = vel.z;
    }
}
