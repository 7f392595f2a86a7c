//! Pause and reset command handlers against a live environment.

use std::thread;
use std::time::Duration;

use serde_json::json;
use sim_env::services::{self, ResetRequest, SetPauseRequest};
use sim_env::{POSITIONS_KEY, RunState};

use crate::fixtures::{Running, empty_world, params, pendulum_world};

#[test]
fn set_pause_callback_toggles_time() {
    let running = Running::start(empty_world(), params(false));
    let clock = running.env.clock();
    let time = clock.now();

    let response = services::set_pause(&running.env, SetPauseRequest { paused: false });
    assert!(response.success);
    running.wait_for(|s| s == RunState::Running);
    thread::sleep(Duration::from_millis(100));
    assert!(clock.now() > time);

    let response = services::set_pause(&running.env, SetPauseRequest { paused: true });
    assert!(response.success);
    running.wait_for(|s| s == RunState::Paused);

    running.shutdown().unwrap();
}

#[test]
fn reset_callback_applies_overrides() {
    let running = Running::start(pendulum_world(), params(false));
    running.params.set(POSITIONS_KEY, json!({"joint1": -1.57}));

    let response = services::reset(&running.env, ResetRequest::default());
    assert!(response.success);

    let q1 = running
        .env
        .with_data(|model, data| {
            let adr = sim_core::address(model, "joint1").unwrap();
            data.qpos[adr.qpos_adr]
        })
        .unwrap();
    assert_eq!(q1, -1.57);

    running.shutdown().unwrap();
}

#[test]
fn callbacks_after_shutdown_report_failure() {
    let running = Running::start(empty_world(), params(true));
    let env = running.env.clone();
    running.shutdown().unwrap();

    assert!(!services::set_pause(&env, SetPauseRequest { paused: true }).success);
    assert!(!services::reset(&env, ResetRequest::default()).success);
}
