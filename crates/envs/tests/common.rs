use envs::{ArmEnv, EnvConfig, TaskBehavior};
use sim::{MocapSim, Model};

/// Tabletop scene matching the runtime asset: a mocap-driven end-effector,
/// one free object resting on the table, and a two-knuckle gripper.
pub fn scene_json() -> &'static str {
    r#"{
        "name": "xarm",
        "timestep": 0.002,
        "table": { "center": [1.655, 0.3, 0.63625], "half_extents": [0.3, 0.35, 0.02] },
        "bodies": [
            { "name": "eef", "pos": [1.55, 0.3, 0.9], "kind": "mocap_driven" },
            { "name": "object", "pos": [1.55, 0.3, 0.68125], "half_size": 0.025 }
        ],
        "joints": [
            { "name": "right_outer_knuckle_joint", "init": 0.0, "range": [0.0, 0.85] },
            { "name": "left_outer_knuckle_joint", "init": 0.0, "range": [0.0, 0.85] }
        ],
        "sites": [
            { "name": "grasp", "body": "eef" },
            { "name": "object_site", "body": "object" }
        ],
        "mocaps": [
            { "name": "robot0:mocap", "body": "eef", "pos": [1.55, 0.3, 0.9], "quat": [0.0, 1.0, 0.0, 0.0] }
        ],
        "grasp": {
            "site": "grasp",
            "object": "object",
            "joints": ["right_outer_knuckle_joint", "left_outer_knuckle_joint"],
            "close_threshold": 0.4,
            "radius": 0.06
        }
    }"#
}

pub fn make_sim() -> MocapSim {
    let model = Model::from_json(scene_json()).expect("test scene should parse");
    MocapSim::from_model(model).expect("test scene should build")
}

pub fn make_env(task: Box<dyn TaskBehavior>, seed: u64) -> ArmEnv {
    let config = EnvConfig {
        seed,
        ..EnvConfig::default()
    };
    ArmEnv::new(make_sim(), task, config).expect("environment should build")
}
