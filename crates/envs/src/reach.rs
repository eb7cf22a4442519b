//! Reach task: drive the end-effector to a sampled point above the table.

use sim::{MocapSim, Vec3};

use crate::task::{uniform, TaskBehavior, TaskContext};

/// Dense-reward reaching task.
pub struct Reach {
    /// Distance at which the goal counts as reached.
    pub success_radius: f32,
}

impl Reach {
    #[must_use]
    pub fn new() -> Self {
        Self {
            success_radius: 0.05,
        }
    }
}

impl Default for Reach {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBehavior for Reach {
    fn sample_goal(&mut self, sim: &mut MocapSim, rng: &mut fastrand::Rng) -> Vec3 {
        let center = Vec3::from_array(sim.model().table.center);
        let table_top = sim.model().table.top();
        Vec3::new(
            center.x + uniform(rng, -0.25, 0.0),
            center.y + uniform(rng, -0.2, 0.2),
            table_top + uniform(rng, 0.1, 0.35),
        )
    }

    fn reward(&self, ctx: &TaskContext, goal: Vec3) -> f32 {
        -ctx.eef.distance(goal)
    }

    fn is_success(&self, ctx: &TaskContext, goal: Vec3) -> bool {
        ctx.eef.distance(goal) < self.success_radius
    }
}
