//! Lift task: grasp the object and raise it off the table.

use sim::{MocapSim, Vec3};

use crate::task::{uniform, TaskBehavior, TaskContext};

/// Name of the free body the task scatters and lifts.
const OBJECT_BODY: &str = "object";

/// Grasp-and-lift task with a dense reach + raise reward.
pub struct Lift {
    /// Height gain over the object's start position that counts as lifted.
    pub lift_height: f32,
    /// Reward weight on the raise term relative to the reach term.
    pub raise_weight: f32,
    object_start_z: f32,
}

impl Lift {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lift_height: 0.15,
            raise_weight: 5.0,
            object_start_z: 0.0,
        }
    }
}

impl Default for Lift {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBehavior for Lift {
    fn sample_goal(&mut self, sim: &mut MocapSim, rng: &mut fastrand::Rng) -> Vec3 {
        let center = Vec3::from_array(sim.model().table.center);
        // Scatter the object across the reachable patch of the table.
        if let Ok(object) = sim.body_id(OBJECT_BODY) {
            let pos = sim.body_position(object);
            let scattered = Vec3::new(
                center.x + uniform(rng, -0.2, 0.0),
                center.y + uniform(rng, -0.15, 0.15),
                pos.z,
            );
            sim.set_body_position(object, scattered);
            sim.forward();
            self.object_start_z = scattered.z;
            return Vec3::new(scattered.x, scattered.y, scattered.z + self.lift_height);
        }
        self.object_start_z = sim.model().table.top();
        Vec3::new(center.x, center.y, self.object_start_z + self.lift_height)
    }

    fn reward(&self, ctx: &TaskContext, _goal: Vec3) -> f32 {
        let raise = (ctx.obj.z - self.object_start_z).max(0.0);
        -ctx.eef.distance(ctx.obj) + self.raise_weight * raise
    }

    fn is_success(&self, ctx: &TaskContext, goal: Vec3) -> bool {
        ctx.obj.z >= goal.z
    }
}
