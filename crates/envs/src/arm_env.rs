//! # Arm Environment Adapter
//!
//! Translates a bounded 4-dimensional control vector into mocap actuation
//! commands, enforces the workspace limits around the table, and surfaces
//! observation/reward tuples each tick. Physics is delegated entirely to the
//! injected [`MocapSim`]; this layer is coordinate clamping and accessor
//! glue.

use render::{Frame, OffscreenRenderer, RenderMode, SceneView, Viewer};
use sim::{mocap, JointId, MocapId, MocapSim, Quat, SiteId, Vec3};
use tracing::debug;

use crate::error::EnvError;
use crate::spaces::ActionSpace;
use crate::task::{Observation, StepInfo, TaskBehavior, TaskContext};

/// Number of substeps one control step stands for; position deltas are
/// scaled by its inverse.
const N_SUBSTEPS: usize = 20;

/// Physics substeps advanced per `step` call.
const STEPS_PER_ACTION: usize = 2;

/// Settle iterations run during `reset`.
const SETTLE_ITERS: usize = 10;

/// Action dimensionality: 3 position deltas plus gripper aperture.
const N_ACTIONS: usize = 4;

/// Default render target size.
const DEFAULT_FRAME_SIZE: u32 = 384;

/// Scene entity names the adapter resolves at construction.
const GRASP_SITE: &str = "grasp";
const OBJECT_SITE: &str = "object_site";
const KNUCKLE_JOINT: &str = "right_outer_knuckle_joint";
const MOCAP_NAME: &str = "robot0:mocap";

/// Fixed task geometry.
#[derive(Debug, Clone, Copy)]
pub struct EnvConfig {
    /// Gripper orientation, held constant for every commanded pose.
    pub gripper_rotation: Quat,
    /// Workspace reference frame.
    pub center_of_table: Vec3,
    /// Lower bound on vertical gripper travel.
    pub min_z: f32,
    /// Upper bound on vertical gripper travel.
    pub max_z: f32,
    /// Seed for goal sampling.
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            gripper_rotation: Quat::new(0.0, 1.0, 0.0, 0.0),
            center_of_table: Vec3::new(1.655, 0.3, 0.63625),
            min_z: 0.2,
            max_z: 1.2,
            seed: 0,
        }
    }
}

/// Mocap-driven arm environment over a table.
///
/// Owns the simulation exclusively; every operation takes `&mut self`, so
/// concurrent stepping is ruled out at the type level. The viewer is
/// acquired lazily on the first human-mode render and released by
/// [`close`](Self::close).
pub struct ArmEnv {
    sim: MocapSim,
    task: Box<dyn TaskBehavior>,
    rng: fastrand::Rng,
    goal: Vec3,
    gripper_rotation: Quat,
    center_of_table: Vec3,
    min_z: f32,
    max_z: f32,
    action_space: ActionSpace,
    grasp_site: SiteId,
    object_site: SiteId,
    knuckle: JointId,
    mocap: MocapId,
    renderer: OffscreenRenderer,
    viewer: Option<Viewer>,
}

impl ArmEnv {
    /// Build the adapter around an injected simulation and task.
    ///
    /// Resolves the scene entities the adapter depends on, aligns the mocap
    /// target with the end-effector, samples the first goal and records the
    /// configured state as the reset snapshot.
    pub fn new(
        mut sim: MocapSim,
        task: Box<dyn TaskBehavior>,
        config: EnvConfig,
    ) -> Result<Self, EnvError> {
        let grasp_site = sim.site_id(GRASP_SITE)?;
        let object_site = sim.site_id(OBJECT_SITE)?;
        let knuckle = sim.joint_id(KNUCKLE_JOINT)?;
        let mocap = sim.mocap_id(MOCAP_NAME)?;

        mocap::reset(&mut sim, mocap)?;
        sim.forward();

        let mut env = Self {
            sim,
            task,
            rng: fastrand::Rng::with_seed(config.seed),
            goal: Vec3::ZERO,
            gripper_rotation: config.gripper_rotation,
            center_of_table: config.center_of_table,
            min_z: config.min_z,
            max_z: config.max_z,
            action_space: ActionSpace::new(N_ACTIONS, -1.0, 1.0),
            grasp_site,
            object_site,
            knuckle,
            mocap,
            renderer: OffscreenRenderer::new(DEFAULT_FRAME_SIZE, DEFAULT_FRAME_SIZE),
            viewer: None,
        };
        env.goal = env.task.sample_goal(&mut env.sim, &mut env.rng);
        env.sim.forward();
        env.sim.save_initial_state();
        Ok(env)
    }

    /// Restore the simulation to its initial configuration, resample the
    /// goal and settle the scene. Returns the resulting observation.
    pub fn reset(&mut self) -> Observation {
        self.sim.reset_data();
        self.goal = self.task.sample_goal(&mut self.sim, &mut self.rng);
        for _ in 0..SETTLE_ITERS {
            self.sim.forward();
        }
        debug!(goal = ?self.goal, "environment reset");
        self.observation()
    }

    /// Apply one control step and advance the simulation.
    ///
    /// `done` is always `false`; episode termination is time-based and
    /// managed by the caller.
    pub fn step(
        &mut self,
        action: &[f32],
    ) -> Result<(Observation, f32, bool, StepInfo), EnvError> {
        if action.len() != N_ACTIONS {
            return Err(EnvError::InvalidAction(format!(
                "expected {N_ACTIONS} components, got {}",
                action.len()
            )));
        }
        if !self.action_space.contains(action) {
            return Err(EnvError::InvalidAction(format!(
                "{action:?} outside [{}, {}]",
                self.action_space.low, self.action_space.high
            )));
        }

        self.apply_action(action);
        for _ in 0..STEPS_PER_ACTION {
            self.sim.step();
        }
        self.step_callback();

        let obs = self.observation();
        let ctx = self.task_context();
        let reward = self.task.reward(&ctx, self.goal);
        let success = self.task.is_success(&ctx, self.goal);
        Ok((
            obs,
            reward,
            false,
            StepInfo {
                is_success: success,
                success,
            },
        ))
    }

    /// Produce one frame at the requested dimensions.
    pub fn render(
        &mut self,
        mode: RenderMode,
        width: u32,
        height: u32,
    ) -> Result<Frame, EnvError> {
        self.sim.forward();
        let view = self.scene_view();
        match mode {
            RenderMode::RgbArray => {
                self.renderer.set_dimensions(width, height);
                Ok(self.renderer.render(&view)?)
            }
            RenderMode::Human => {
                let viewer = self
                    .viewer
                    .get_or_insert_with(|| Viewer::new(width, height));
                Ok(viewer.show(&view, width, height)?)
            }
        }
    }

    /// Release the viewer if one was created. Idempotent.
    pub fn close(&mut self) {
        if self.viewer.take().is_some() {
            debug!("viewer released");
        }
    }

    /// Duration of one control step in seconds.
    #[must_use]
    pub fn dt(&self) -> f32 {
        N_SUBSTEPS as f32 * self.sim.timestep()
    }

    /// Grasp-site position of the end-effector.
    #[must_use]
    pub fn eef(&self) -> Vec3 {
        self.sim.site_position(self.grasp_site)
    }

    /// Object-site position.
    #[must_use]
    pub fn obj(&self) -> Vec3 {
        self.sim.site_position(self.object_site)
    }

    /// Current episode goal.
    #[must_use]
    pub fn goal(&self) -> Vec3 {
        self.goal
    }

    /// End-effector position concatenated with the gripper joint angle.
    #[must_use]
    pub fn robot_state(&self) -> [f32; 4] {
        let eef = self.eef();
        [eef.x, eef.y, eef.z, self.sim.joint_position(self.knuckle)]
    }

    /// Declared action space.
    #[must_use]
    pub fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    /// Read-only access to the underlying simulation.
    #[must_use]
    pub fn sim(&self) -> &MocapSim {
        &self.sim
    }

    /// Flat observation: robot state, object position, goal.
    #[must_use]
    pub fn observation(&self) -> Observation {
        let mut obs = Vec::with_capacity(10);
        obs.extend_from_slice(&self.robot_state());
        obs.extend_from_slice(&self.obj().to_array());
        obs.extend_from_slice(&self.goal.to_array());
        obs
    }

    fn task_context(&self) -> TaskContext {
        TaskContext {
            eef: self.eef(),
            obj: self.obj(),
            gripper: self.sim.joint_position(self.knuckle),
            table_top: self.sim.model().table.top(),
        }
    }

    fn scene_view(&self) -> SceneView {
        let table = &self.sim.model().table;
        SceneView {
            table_center: table.center,
            table_half_extents: table.half_extents,
            eef: self.eef().to_array(),
            obj: self.obj().to_array(),
            goal: self.goal.to_array(),
        }
    }

    /// Build and forward the mocap control vector for one validated action.
    fn apply_action(&mut self, action: &[f32]) {
        let requested = Vec3::new(action[0], action[1], action[2]);
        let pos_ctrl = self.limit_gripper(self.eef(), requested) * (1.0 / N_SUBSTEPS as f32);
        let gripper_ctrl = action[3];
        let rot = self.gripper_rotation;
        let ctrl = [
            pos_ctrl.x,
            pos_ctrl.y,
            pos_ctrl.z,
            rot.w,
            rot.x,
            rot.y,
            rot.z,
            gripper_ctrl,
            gripper_ctrl,
        ];
        mocap::apply_action(&mut self.sim, self.mocap, &ctrl);
    }

    /// Suppress commanded motion past the workspace bounds.
    ///
    /// Once the gripper has crossed a bound, the delta pointing further out
    /// is clamped to zero; the position itself is never snapped back. The x
    /// bounds are offset by -0.105 from the table center and are not
    /// symmetric around it.
    fn limit_gripper(&self, gripper_pos: Vec3, mut pos_ctrl: Vec3) -> Vec3 {
        if gripper_pos.x > self.center_of_table.x - 0.105 + 0.15 {
            pos_ctrl.x = pos_ctrl.x.min(0.0);
        }
        if gripper_pos.x < self.center_of_table.x - 0.105 - 0.3 {
            pos_ctrl.x = pos_ctrl.x.max(0.0);
        }
        if gripper_pos.y > self.center_of_table.y + 0.3 {
            pos_ctrl.y = pos_ctrl.y.min(0.0);
        }
        if gripper_pos.y < self.center_of_table.y - 0.3 {
            pos_ctrl.y = pos_ctrl.y.max(0.0);
        }
        if gripper_pos.z > self.max_z {
            pos_ctrl.z = pos_ctrl.z.min(0.0);
        }
        if gripper_pos.z < self.min_z {
            pos_ctrl.z = pos_ctrl.z.max(0.0);
        }
        pos_ctrl
    }

    /// Post-step synchronization hook.
    fn step_callback(&mut self) {
        self.sim.forward();
    }
}
