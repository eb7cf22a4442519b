use sim::{mocap, Model, MocapSim, SimError, Vec3};

fn bench_scene() -> MocapSim {
    let model = Model::from_json(
        r#"{
            "name": "bench",
            "table": { "center": [1.655, 0.3, 0.63625], "half_extents": [0.3, 0.35, 0.02] },
            "bodies": [
                { "name": "eef", "pos": [1.55, 0.3, 0.9], "kind": "mocap_driven" },
                { "name": "object", "pos": [1.5, 0.25, 0.9], "half_size": 0.025 }
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
        }"#,
    )
    .expect("bench scene should parse");
    MocapSim::from_model(model).expect("bench scene should build")
}

/// A free body released above the table falls and comes to rest exactly on
/// the surface, never penetrating it.
#[test]
fn object_settles_on_table() {
    let mut sim = bench_scene();
    let object = sim.body_id("object").unwrap();
    let rest = sim.model().table.top() + 0.025;

    for _ in 0..500 {
        sim.step();
        assert!(
            sim.body_position(object).z >= rest - 1e-6,
            "object must not sink below the table surface"
        );
    }
    let settled = sim.body_position(object);
    assert!((settled.z - rest).abs() < 1e-5, "object should rest on the table");
    assert!((settled.x - 1.5).abs() < 1e-6, "free fall should not drift laterally");
}

/// The end-effector tracks its mocap target within the per-substep rate
/// limit.
#[test]
fn eef_tracks_mocap_target() {
    let mut sim = bench_scene();
    let mocap = sim.mocap_id("robot0:mocap").unwrap();
    let eef = sim.body_id("eef").unwrap();
    let start = sim.body_position(eef);

    sim.set_mocap_position(mocap, start + Vec3::new(0.0, 0.0, 0.03));
    sim.step();
    let moved = sim.body_position(eef);
    assert!((moved.z - (start.z + 0.03)).abs() < 1e-6, "small deltas land in one substep");

    sim.set_mocap_position(mocap, moved + Vec3::new(0.2, 0.0, 0.0));
    sim.step();
    let limited = sim.body_position(eef);
    assert!(
        (limited.x - (moved.x + 0.05)).abs() < 1e-6,
        "large deltas are rate limited per substep"
    );
}

/// `apply_action` shifts the mocap target by the commanded delta and routes
/// the gripper pair to the grasp joints.
#[test]
fn apply_action_moves_target_and_gripper() {
    let mut sim = bench_scene();
    let mocap = sim.mocap_id("robot0:mocap").unwrap();
    let knuckle = sim.joint_id("right_outer_knuckle_joint").unwrap();
    let target = sim.mocap_position(mocap);

    mocap::apply_action(&mut sim, mocap, &[0.01, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 0.5]);
    let shifted = sim.mocap_position(mocap);
    assert!((shifted.x - (target.x + 0.01)).abs() < 1e-6);
    assert!((shifted.y - target.y).abs() < 1e-6);

    for _ in 0..60 {
        sim.step();
    }
    assert!(
        (sim.joint_position(knuckle) - 0.5).abs() < 1e-4,
        "knuckle joint should servo to the commanded aperture"
    );
}

/// Closing the gripper on the object attaches it; the object then follows
/// the end-effector upward.
#[test]
fn grasp_lifts_object_with_eef() {
    let mut sim = bench_scene();
    let mocap = sim.mocap_id("robot0:mocap").unwrap();
    let eef = sim.body_id("eef").unwrap();
    let object = sim.body_id("object").unwrap();

    // Let the object settle, park the end-effector on it, then close.
    for _ in 0..500 {
        sim.step();
    }
    sim.set_mocap_position(mocap, sim.body_position(object));
    for _ in 0..3 {
        sim.step();
    }
    mocap::apply_action(&mut sim, mocap, &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.85, 0.85]);
    for _ in 0..60 {
        sim.step();
    }
    assert!(sim.grasped(), "gripper closed on the object should engage the grasp");

    let before = sim.body_position(object);
    sim.set_mocap_position(mocap, sim.body_position(eef) + Vec3::new(0.0, 0.0, 0.1));
    for _ in 0..4 {
        sim.step();
    }
    let after = sim.body_position(object);
    assert!(after.z > before.z + 0.05, "held object should rise with the end-effector");
}

/// `reset_data` restores the construction-time snapshot.
#[test]
fn reset_restores_initial_state() {
    let mut sim = bench_scene();
    let mocap = sim.mocap_id("robot0:mocap").unwrap();
    let eef = sim.body_id("eef").unwrap();
    let start = sim.body_position(eef);
    let start_time = sim.time();

    sim.set_mocap_position(mocap, start + Vec3::new(0.1, 0.1, -0.1));
    for _ in 0..50 {
        sim.step();
    }
    assert!(sim.body_position(eef).distance(start) > 0.05);

    sim.reset_data();
    assert_eq!(sim.body_position(eef), start);
    assert!((sim.time() - start_time).abs() < 1e-9);
    assert_eq!(sim.mocap_position(mocap), start, "mocap target is part of the snapshot");
}

/// Named lookups fail with the matching error variant.
#[test]
fn unknown_lookups_report_variant() {
    let sim = bench_scene();
    assert!(matches!(sim.site_id("nope"), Err(SimError::UnknownSite(_))));
    assert!(matches!(sim.joint_id("nope"), Err(SimError::UnknownJoint(_))));
    assert!(matches!(sim.mocap_id("nope"), Err(SimError::UnknownMocap(_))));
    assert!(matches!(sim.body_id("nope"), Err(SimError::UnknownBody(_))));
    assert!(matches!(
        sim.site_position_by_name("nope"),
        Err(SimError::UnknownSite(_))
    ));
}
