//! Environment lifecycle: time advancement, pause, step budget, shutdown.

use std::thread;
use std::time::{Duration, Instant};

use sim_env::{EnvError, Environment, LoadError, RunState};
use sim_mjcf::MjcfError;

use crate::fixtures::{Running, TRANSITION_TIMEOUT, empty_world, params, pendulum_world};

#[test]
fn init_with_model_keeps_time_running() {
    let running = Running::start(empty_world(), params(true));
    assert_eq!(running.env.state(), RunState::Running);

    let clock = running.env.clock();
    let first = clock.now();
    thread::sleep(Duration::from_millis(200));
    let second = clock.now();
    assert!(second > first, "time should be running: {first} -> {second}");
    assert!(second >= 0.001 * 100.0);

    running.shutdown().unwrap();
    let frozen = clock.now();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(clock.now(), frozen, "clock must stop with the environment");
}

#[test]
fn pause_unpause() {
    let running = Running::start(empty_world(), params(false));
    assert_eq!(running.env.state(), RunState::Paused);

    let clock = running.env.clock();
    let time = clock.now();
    thread::sleep(Duration::from_millis(500));
    assert_eq!(clock.now(), time, "time should not be running");

    running.env.set_pause(false).unwrap();
    thread::sleep(Duration::from_millis(500));
    assert!(clock.now() > time, "time should have been moving forward");

    running.env.set_pause(true).unwrap();
    running.wait_for(|s| s == RunState::Paused);
    let time = clock.now();
    thread::sleep(Duration::from_millis(500));
    assert_eq!(clock.now(), time, "time should not have moved forward");

    running.shutdown().unwrap();
}

#[test]
fn time_is_step_count_times_timestep() {
    let running = Running::start(pendulum_world(), params(true));
    thread::sleep(Duration::from_millis(50));
    running.env.set_pause(true).unwrap();
    running.wait_for(|s| s == RunState::Paused);

    let clock = running.env.clock();
    let (nstep, time) = running
        .env
        .with_data(|_, data| (data.nstep, data.time))
        .unwrap();
    assert!(nstep > 0);
    assert_eq!(clock.steps(), nstep);
    assert_eq!(clock.now(), time);
    assert_eq!(time, nstep as f64 * 0.001);

    running.shutdown().unwrap();
}

#[test]
fn num_steps_halts_at_budget() {
    let params = params(true);
    params.set("num_steps", 100);
    let running = Running::start(empty_world(), params);

    running.wait_for(|s| s == RunState::HaltedByBudget);
    let clock = running.env.clock();
    assert_eq!(clock.steps(), 100);
    assert_eq!(clock.now(), 0.001 * 100.0);
    assert_eq!(running.env.remaining_steps(), Some(0));

    // Halted is not shut down: the environment still answers and time
    // stays frozen even when unpaused.
    running.env.set_pause(false).unwrap();
    thread::sleep(Duration::from_millis(100));
    assert_eq!(clock.steps(), 100);
    assert_eq!(running.env.state(), RunState::HaltedByBudget);

    running.shutdown().unwrap();
    assert_eq!(clock.now(), 0.001 * 100.0);
}

#[test]
fn num_steps_counts_only_running_steps() {
    let params = params(false);
    params.set("num_steps", 50);
    let running = Running::start(empty_world(), params);

    thread::sleep(Duration::from_millis(100));
    assert_eq!(running.env.clock().steps(), 0);
    assert_eq!(running.env.remaining_steps(), Some(50));

    running.env.set_pause(false).unwrap();
    running.wait_for(|s| s == RunState::HaltedByBudget);
    assert_eq!(running.env.clock().steps(), 50);

    running.shutdown().unwrap();
}

#[test]
fn exit_on_budget_joins_by_itself() {
    let params = params(true);
    params.set("num_steps", 100);
    params.set("exit_on_budget", true);

    let env = Environment::new(params);
    let worker = {
        let env = env.clone();
        thread::spawn(move || env.run(empty_world()))
    };
    worker.join().unwrap().unwrap();

    assert_eq!(env.state(), RunState::Terminated);
    assert_eq!(env.clock().now(), 0.001 * 100.0);
}

#[test]
fn shutdown_while_paused() {
    let running = Running::start(pendulum_world(), params(false));
    let env = running.env.clone();

    let start = Instant::now();
    running.shutdown().unwrap();
    assert!(start.elapsed() < TRANSITION_TIMEOUT);
    assert_eq!(env.state(), RunState::Terminated);
}

#[test]
fn shutdown_while_running() {
    let running = Running::start(pendulum_world(), params(true));
    let env = running.env.clone();
    thread::sleep(Duration::from_millis(20));

    running.shutdown().unwrap();
    assert_eq!(env.state(), RunState::Terminated);
    assert!(env.model().is_none());
}

#[test]
fn shutdown_with_real_time_pacing() {
    let params = params(true);
    params.set("real_time_factor", 1.0);
    let running = Running::start(pendulum_world(), params);
    let env = running.env.clone();
    let clock = env.clock();

    thread::sleep(Duration::from_millis(200));
    let simulated = clock.now();
    // Paced at real time, 200 ms of wall clock cannot produce a full second.
    assert!(simulated > 0.0 && simulated < 1.0, "simulated {simulated}");

    running.shutdown().unwrap();
    assert_eq!(env.state(), RunState::Terminated);
}

#[test]
fn control_after_termination_is_rejected() {
    let running = Running::start(empty_world(), params(true));
    let env = running.env.clone();
    running.shutdown().unwrap();

    assert!(matches!(env.set_pause(true), Err(EnvError::InvalidControlCall)));
    assert!(matches!(env.reset(), Err(EnvError::InvalidControlCall)));
    assert!(matches!(env.request_shutdown(), Err(EnvError::InvalidControlCall)));
}

#[test]
fn missing_model_is_a_load_error() {
    let env = Environment::new(params(true));
    let err = env.run("/no/such/world.xml").unwrap_err();
    assert!(matches!(
        err,
        EnvError::Load(LoadError::Model(MjcfError::Io { .. }))
    ));
    assert_eq!(env.state(), RunState::Terminated);
    assert_eq!(env.clock().now(), 0.0);
}

#[test]
fn malformed_model_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    std::fs::write(
        &path,
        r#"<mujoco><worldbody><body name="a"><joint type="corkscrew"/></body></worldbody></mujoco>"#,
    )
    .unwrap();

    let env = Environment::new(params(true));
    let err = env.run(&path).unwrap_err();
    assert!(matches!(err, EnvError::Load(LoadError::Model(_))));
}
