//! Initial joint overrides: applied at load, re-applied on reset.

use serde_json::json;
use sim_core::{Model, joint_index};
use sim_env::{POSITIONS_KEY, RunState, VELOCITIES_KEY};

use crate::fixtures::{Running, params, pendulum_world};

fn joint_state(model: &Model, data: &sim_core::Data, name: &str) -> (f64, f64) {
    let id = joint_index::resolve(model, name)
        .unwrap_or_else(|| panic!("'{name}' should be found as joint in model"));
    let q = data.qpos[joint_index::position_offset(model, id).unwrap()];
    let v = data.qvel[joint_index::velocity_offset(model, id).unwrap()];
    (q, v)
}

fn read_joints(running: &Running) -> [(f64, f64); 3] {
    running
        .env
        .with_data(|model, data| {
            ["joint0", "joint1", "joint2"].map(|name| joint_state(model, data, name))
        })
        .unwrap()
}

fn set_custom_maps(running_params: &sim_env::MemoryParamStore) {
    running_params.set(
        POSITIONS_KEY,
        json!({"joint0": -0.314, "joint1": -1.57, "joint2": -0.66}),
    );
    running_params.set(VELOCITIES_KEY, json!({"joint2": 1.05}));
}

#[test]
fn default_initial_joint_states() {
    let running = Running::start(pendulum_world(), params(false));

    assert_eq!(read_joints(&running), [(0.0, 0.0); 3]);

    running.shutdown().unwrap();
}

#[test]
fn custom_initial_joint_states() {
    let params = params(false);
    set_custom_maps(&params);
    let running = Running::start(pendulum_world(), params);

    let [j0, j1, j2] = read_joints(&running);
    assert_eq!(j0, (-0.314, 0.0), "'joint0' position should be changed");
    assert_eq!(j1, (-1.57, 0.0), "'joint1' position should be changed");
    assert_eq!(j2, (-0.66, 1.05), "'joint2' position and velocity should be changed");

    running.shutdown().unwrap();
}

#[test]
fn custom_initial_joint_states_from_document() {
    let params = std::sync::Arc::new(
        sim_env::MemoryParamStore::from_json_str(
            r#"{
                "unpause": false,
                "initial_joint_positions": {"joint_map": {"joint1": 0.5}},
                "initial_joint_velocities": {"joint_map": {"joint0": -2.0}}
            }"#,
        )
        .unwrap(),
    );
    let running = Running::start(pendulum_world(), params);

    let [j0, j1, j2] = read_joints(&running);
    assert_eq!(j0, (0.0, -2.0));
    assert_eq!(j1, (0.5, 0.0));
    assert_eq!(j2, (0.0, 0.0));

    running.shutdown().unwrap();
}

#[test]
fn custom_initial_joint_states_on_reset() {
    let running = Running::start(pendulum_world(), params(false));
    assert_eq!(read_joints(&running), [(0.0, 0.0); 3]);

    set_custom_maps(&running.params);
    let time_before = running.env.clock().now();
    let report = running.env.reset().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.applied, 4);

    let [j0, j1, j2] = read_joints(&running);
    assert_eq!(j0, (-0.314, 0.0));
    assert_eq!(j1, (-1.57, 0.0));
    assert_eq!(j2, (-0.66, 1.05));
    assert_eq!(running.env.clock().now(), time_before);
    assert_eq!(running.env.state(), RunState::Paused);

    running.shutdown().unwrap();
}

#[test]
fn reset_keeps_unlisted_joints() {
    let running = Running::start(pendulum_world(), params(false));

    running
        .env
        .with_data_mut(|model, data| {
            let adr = joint_index::address(model, "joint1").unwrap();
            data.qpos[adr.qpos_adr] = 0.42;
            data.qvel[adr.dof_adr] = -0.1;
        })
        .unwrap();
    running.params.set(POSITIONS_KEY, json!({"joint0": 0.2}));
    running.env.reset().unwrap();

    let [j0, j1, _] = read_joints(&running);
    assert_eq!(j0, (0.2, 0.0));
    assert_eq!(j1, (0.42, -0.1), "unlisted joint must keep its pre-reset value");

    running.shutdown().unwrap();
}

#[test]
fn reset_with_restore_defaults_policy() {
    let params = params(false);
    params.set("reset_policy", "restore_defaults");
    let running = Running::start(pendulum_world(), params);

    running
        .env
        .with_data_mut(|_, data| {
            data.qpos.fill(0.3);
            data.qvel.fill(0.3);
        })
        .unwrap();
    running.params.set(VELOCITIES_KEY, json!({"joint2": 1.05}));
    running.env.reset().unwrap();

    assert_eq!(read_joints(&running), [(0.0, 0.0), (0.0, 0.0), (0.0, 1.05)]);

    running.shutdown().unwrap();
}

#[test]
fn reset_while_running_and_halted() {
    // Paced at real time, the 200-step budget keeps the loop running for ~0.2 s.
    let params = params(true);
    params.set("num_steps", 200);
    params.set("real_time_factor", 1.0);
    let running = Running::start(pendulum_world(), params);
    assert_eq!(running.env.state(), RunState::Running);

    running.params.set(POSITIONS_KEY, json!({"joint2": 0.25}));
    let report = running.env.reset().unwrap();
    assert_eq!(report.applied, 1);
    assert!(running.env.clock().steps() < 200);

    running.wait_for(|s| s == RunState::HaltedByBudget);
    // An undriven cart at rest stays where the reset put it.
    let [_, _, (q2, v2)] = read_joints(&running);
    assert_eq!((q2, v2), (0.25, 0.0));

    running.params.set(POSITIONS_KEY, json!({"joint2": -0.25}));
    running.env.reset().unwrap();

    let [_, _, (q2, _)] = read_joints(&running);
    assert_eq!(q2, -0.25);
    assert_eq!(running.env.state(), RunState::HaltedByBudget);
    assert_eq!(running.env.clock().steps(), 200);

    running.shutdown().unwrap();
}

#[test]
fn unknown_joint_names_are_not_fatal() {
    let params = params(false);
    params.set(
        POSITIONS_KEY,
        json!({"joint0": 0.1, "no_such_joint": 9.0, "joint2": 0.3}),
    );
    params.set(VELOCITIES_KEY, json!({"ghost": 1.0, "joint1": 0.7}));
    let running = Running::start(pendulum_world(), params);
    assert_eq!(running.env.state(), RunState::Paused);

    let [j0, j1, j2] = read_joints(&running);
    assert_eq!(j0, (0.1, 0.0));
    assert_eq!(j1, (0.0, 0.7));
    assert_eq!(j2, (0.3, 0.0));

    let report = running.env.reset().unwrap();
    assert_eq!(report.unknown_positions, vec!["no_such_joint".to_string()]);
    assert_eq!(report.unknown_velocities, vec!["ghost".to_string()]);
    assert_eq!(report.applied, 3);

    running.shutdown().unwrap();
}

#[test]
fn ill_typed_map_on_reset_is_reported() {
    let running = Running::start(pendulum_world(), params(false));
    running.params.set(POSITIONS_KEY, json!({"joint0": "left"}));

    let err = running.env.reset().unwrap_err();
    assert!(matches!(err, sim_env::EnvError::Config(_)));
    assert_eq!(read_joints(&running)[0], (0.0, 0.0));

    running.shutdown().unwrap();
}
