//! Task behavior interface.

use sim::{MocapSim, Vec3};

/// Flat observation vector handed to the policy.
pub type Observation = Vec<f32>;

/// Per-step info map.
///
/// `is_success` and `success` carry the same flag; both keys are kept for
/// consumers that read either one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub is_success: bool,
    pub success: bool,
}

/// Accessor snapshot the environment computes once per hook invocation.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext {
    /// Grasp-site position.
    pub eef: Vec3,
    /// Object-site position.
    pub obj: Vec3,
    /// Gripper knuckle joint angle.
    pub gripper: f32,
    /// World-space height of the table surface.
    pub table_top: f32,
}

/// Task-specific semantics supplied by a concrete task.
///
/// The environment adapter owns the lifecycle and workspace geometry; goal
/// sampling, reward shaping and success detection are delegated here. Every
/// method is required, so an environment can only be constructed with a
/// complete task definition.
pub trait TaskBehavior {
    /// Resample the episode goal. May reposition scene bodies (e.g. scatter
    /// the object across the table) before returning the new goal point.
    fn sample_goal(&mut self, sim: &mut MocapSim, rng: &mut fastrand::Rng) -> Vec3;

    /// Scalar reward for the current state.
    fn reward(&self, ctx: &TaskContext, goal: Vec3) -> f32;

    /// Whether the current state satisfies the task.
    fn is_success(&self, ctx: &TaskContext, goal: Vec3) -> bool;
}

/// Uniform sample from `[lo, hi)`.
pub(crate) fn uniform(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.f32()
}
