//! Episode rollout loop and scripted policies.

use std::fs;

use anyhow::{Context, Result};
use envs::{ArmEnv, EnvConfig, Lift, Reach, TaskBehavior};
use render::RenderMode;
use sim::{MocapSim, Model};
use tracing::info;

use crate::{Args, TaskKind};

/// Steps spent closing the gripper before pulling up.
const CLOSE_STEPS: u32 = 25;

/// Simple goal-seeking controller used to exercise the environments.
struct ScriptedPolicy {
    task: TaskKind,
    closing: u32,
}

impl ScriptedPolicy {
    fn new(task: TaskKind) -> Self {
        Self { task, closing: 0 }
    }

    fn begin_episode(&mut self) {
        self.closing = 0;
    }

    /// Observation layout: end-effector (3), gripper angle, object (3),
    /// goal (3).
    fn act(&mut self, obs: &[f32]) -> [f32; 4] {
        let toward = |from: &[f32], to: &[f32]| {
            [
                (20.0 * (to[0] - from[0])).clamp(-1.0, 1.0),
                (20.0 * (to[1] - from[1])).clamp(-1.0, 1.0),
                (20.0 * (to[2] - from[2])).clamp(-1.0, 1.0),
            ]
        };
        let eef = &obs[..3];
        let obj = &obs[4..7];
        let goal = &obs[7..10];
        match self.task {
            TaskKind::Reach => {
                let d = toward(eef, goal);
                [d[0], d[1], d[2], 0.0]
            }
            TaskKind::Lift => {
                let dist = (obj[0] - eef[0]).hypot(obj[1] - eef[1]).hypot(obj[2] - eef[2]);
                if self.closing >= CLOSE_STEPS {
                    [0.0, 0.0, 1.0, 1.0]
                } else if dist < 0.02 {
                    self.closing += 1;
                    [0.0, 0.0, 0.0, 1.0]
                } else {
                    let d = toward(eef, obj);
                    [d[0], d[1], d[2], -1.0]
                }
            }
        }
    }
}

fn build_task(kind: TaskKind) -> Box<dyn TaskBehavior> {
    match kind {
        TaskKind::Reach => Box::new(Reach::new()),
        TaskKind::Lift => Box::new(Lift::new()),
    }
}

/// Load the scene, build the environment and roll out the requested
/// episodes.
pub fn run(args: &Args) -> Result<()> {
    let model = Model::load(&args.asset_root, &args.scene)
        .with_context(|| format!("loading scene `{}`", args.scene))?;
    let sim = MocapSim::from_model(model).context("building simulation")?;
    let config = EnvConfig {
        seed: args.seed,
        ..EnvConfig::default()
    };
    let mut env =
        ArmEnv::new(sim, build_task(args.task), config).context("building environment")?;
    let mut policy = ScriptedPolicy::new(args.task);

    if let Some(dir) = &args.render_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    for episode in 0..args.episodes {
        let mut obs = env.reset();
        policy.begin_episode();
        let mut episode_return = 0.0_f32;
        let mut solved = false;
        for _ in 0..args.steps {
            let action = policy.act(&obs);
            let (next, reward, _done, step_info) = env
                .step(&action)
                .context("stepping environment")?;
            obs = next;
            episode_return += reward;
            solved |= step_info.success;
        }
        info!(episode, episode_return, solved, "episode finished");

        if let Some(dir) = &args.render_dir {
            let frame = env.render(RenderMode::RgbArray, args.width, args.height)?;
            let path = dir.join(format!("episode_{episode}.png"));
            frame.save_png(&path).context("saving frame")?;
            info!(path = %path.display(), "frame saved");
        }
    }

    env.close();
    Ok(())
}
