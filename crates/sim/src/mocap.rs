//! # Mocap Actuation
//!
//! Applies the concatenated control vector the environment layer builds each
//! step: a position delta for the mocap target, the fixed gripper
//! orientation, and a symmetric command pair for the gripper joints.

use crate::error::SimError;
use crate::simulation::{MocapId, MocapSim};
use crate::types::{Quat, Vec3};

/// Length of the concatenated control vector: 3 position delta + 4 quat
/// + 2 gripper commands.
pub const CTRL_LEN: usize = 9;

/// Shift the mocap target by the commanded delta, set its orientation, and
/// forward the gripper pair to the grasp joints.
///
/// The gripper commands are ignored when the scene declares no grasp
/// coupling.
pub fn apply_action(sim: &mut MocapSim, mocap: MocapId, ctrl: &[f32; CTRL_LEN]) {
    let delta = Vec3::new(ctrl[0], ctrl[1], ctrl[2]);
    let quat = Quat::new(ctrl[3], ctrl[4], ctrl[5], ctrl[6]);
    let target = sim.mocap_position(mocap) + delta;
    sim.set_mocap_position(mocap, target);
    sim.set_mocap_quat(mocap, quat);

    let joints: Vec<_> = sim
        .model()
        .grasp
        .as_ref()
        .map(|g| g.joints.clone())
        .unwrap_or_default();
    for (name, &value) in joints.iter().zip(&ctrl[7..]) {
        // Joints were validated at construction, so the lookup cannot fail.
        if let Ok(joint) = sim.joint_id(name) {
            sim.set_ctrl(joint, value);
        }
    }
}

/// Align the mocap target with its welded body and zero the grasp joints.
///
/// Used once during scene setup so the first applied delta moves relative to
/// the end-effector's actual pose.
pub fn reset(sim: &mut MocapSim, mocap: MocapId) -> Result<(), SimError> {
    let body = sim.mocap_body(mocap);
    let pos = sim.body_position(body);
    sim.set_mocap_position(mocap, pos);

    let joints: Vec<_> = sim
        .model()
        .grasp
        .as_ref()
        .map(|g| g.joints.clone())
        .unwrap_or_default();
    for name in &joints {
        sim.set_joint_position_by_name(name, 0.0)?;
    }
    sim.forward();
    Ok(())
}
