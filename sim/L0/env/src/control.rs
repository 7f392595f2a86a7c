//! Control surface: entry points for threads other than the stepping thread.
//!
//! Every call takes the environment lock, so it is serialized against the
//! step in progress and its effects are visible to the next lock holder.
//! Once shutdown has been observed, setters are no-ops that return
//! [`EnvError::InvalidControlCall`].

use std::sync::Arc;
use std::time::Duration;

use sim_core::{Data, Model};
use tracing::{debug, info};

use crate::config::{EnvConfig, ResetPolicy};
use crate::environment::{Environment, RunState, Shared, Sim, apply_overrides};
use crate::error::{EnvError, Result};
use crate::initial_state::{ApplyReport, JointOverrides};

impl Environment {
    /// Request pause (`true`) or unpause (`false`).
    ///
    /// Idempotent. Takes effect at the next iteration boundary. While halted
    /// by the step budget the flag is recorded but time stays frozen.
    ///
    /// # Errors
    ///
    /// [`EnvError::NotLoaded`] before initialization finishes,
    /// [`EnvError::InvalidControlCall`] after shutdown.
    pub fn set_pause(&self, paused: bool) -> Result<()> {
        let mut shared = self.lock();
        check_active(&shared)?;
        if shared.paused != paused {
            debug!(paused, "pause flag changed");
        }
        shared.paused = paused;
        self.inner.changed.notify_all();
        Ok(())
    }

    /// Re-read the joint override maps and apply them to the current state.
    ///
    /// Does not reload the model, does not touch simulated time, and leaves
    /// the running/paused classification alone. Joints absent from the maps
    /// are handled per [`ResetPolicy`].
    ///
    /// # Errors
    ///
    /// [`EnvError::Config`] if the override maps are ill-typed,
    /// [`EnvError::NotLoaded`] before initialization finishes,
    /// [`EnvError::InvalidControlCall`] after shutdown.
    pub fn reset(&self) -> Result<ApplyReport> {
        let overrides = JointOverrides::from_store(self.params())?;

        let mut shared = self.lock();
        check_active(&shared)?;
        let policy = shared.config.reset_policy;
        let Some(Sim { model, data }) = shared.sim.as_mut() else {
            return Err(EnvError::NotLoaded);
        };
        if policy == ResetPolicy::RestoreDefaults {
            data.reset_joint_state(model);
        }
        let report = apply_overrides(model, data, &overrides);
        info!(
            ?policy,
            overrides = report.applied,
            time = data.time,
            "environment reset"
        );
        Ok(report)
    }

    /// Ask the stepping loop to shut down. Never waits for it.
    ///
    /// Join the thread running [`run`](Self::run) to observe
    /// [`RunState::Terminated`]. Before load finishes, the loop shuts down
    /// right after initialization.
    ///
    /// # Errors
    ///
    /// [`EnvError::InvalidControlCall`] once shutdown is already under way.
    pub fn request_shutdown(&self) -> Result<()> {
        let mut shared = self.lock();
        if matches!(shared.state, RunState::ShuttingDown | RunState::Terminated) {
            return Err(EnvError::InvalidControlCall);
        }
        if !shared.shutdown_requested {
            info!(state = %shared.state, "shutdown requested");
        }
        shared.shutdown_requested = true;
        self.inner.changed.notify_all();
        Ok(())
    }

    /// Read the model and state under the lock.
    ///
    /// # Errors
    ///
    /// [`EnvError::NotLoaded`] if no model is loaded (before load or after
    /// termination).
    pub fn with_data<R>(&self, f: impl FnOnce(&Model, &Data) -> R) -> Result<R> {
        let shared = self.lock();
        let sim = shared.sim.as_ref().ok_or(EnvError::NotLoaded)?;
        Ok(f(sim.model.as_ref(), &sim.data))
    }

    /// Mutate the state under the lock, between two steps.
    ///
    /// # Errors
    ///
    /// As [`reset`](Self::reset), minus the parameter errors.
    pub fn with_data_mut<R>(&self, f: impl FnOnce(&Model, &mut Data) -> R) -> Result<R> {
        let mut shared = self.lock();
        check_active(&shared)?;
        let Some(Sim { model, data }) = shared.sim.as_mut() else {
            return Err(EnvError::NotLoaded);
        };
        Ok(f(model.as_ref(), data))
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.lock().state
    }

    /// Whether the pause flag is set.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    /// Steps left in the budget, if one is set.
    #[must_use]
    pub fn remaining_steps(&self) -> Option<u64> {
        self.lock().remaining_steps
    }

    /// Configuration captured at initialization (defaults before that).
    #[must_use]
    pub fn config(&self) -> EnvConfig {
        self.lock().config.clone()
    }

    /// The loaded model, if any.
    #[must_use]
    pub fn model(&self) -> Option<Arc<Model>> {
        self.lock().sim.as_ref().map(|sim| Arc::clone(&sim.model))
    }

    /// Block until `pred` holds for the current state or `timeout` passes.
    ///
    /// Returns the state that satisfied `pred`, or `None` on timeout.
    pub fn wait_for(&self, pred: impl Fn(RunState) -> bool, timeout: Duration) -> Option<RunState> {
        let guard = self.lock();
        let (guard, _) = self
            .inner
            .changed
            .wait_timeout_while(guard, timeout, |shared| !pred(shared.state))
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        pred(guard.state).then_some(guard.state)
    }

    /// Block until initialization has finished, successfully or not.
    pub fn wait_until_loaded(&self, timeout: Duration) -> Option<RunState> {
        self.wait_for(RunState::is_past_initializing, timeout)
    }
}

fn check_active(shared: &Shared) -> Result<()> {
    match shared.state {
        state if state.is_active() => Ok(()),
        RunState::Idle | RunState::Initializing => Err(EnvError::NotLoaded),
        _ => Err(EnvError::InvalidControlCall),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::initial_state::{POSITIONS_KEY, VELOCITIES_KEY};
    use crate::params::MemoryParamStore;
    use serde_json::json;
    use std::thread::{self, JoinHandle};

    const TWO_JOINTS: &str = r#"
        <mujoco model="two_joints">
            <option timestep="0.001" gravity="0 0 0"/>
            <worldbody>
                <body name="a">
                    <joint name="joint0" type="slide" axis="1 0 0"/>
                    <geom type="sphere" size="0.1" mass="1"/>
                </body>
                <body name="b">
                    <joint name="joint1" type="slide" axis="0 1 0"/>
                    <geom type="sphere" size="0.1" mass="1"/>
                </body>
            </worldbody>
        </mujoco>
    "#;

    fn start_paused(store: &Arc<MemoryParamStore>) -> (Environment, JoinHandle<Result<()>>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_joints.xml");
        std::fs::write(&path, TWO_JOINTS).unwrap();
        store.set("unpause", false);

        let env = Environment::new(store.clone());
        let worker = {
            let env = env.clone();
            thread::spawn(move || env.run(path))
        };
        assert_eq!(
            env.wait_until_loaded(Duration::from_secs(10)),
            Some(RunState::Paused)
        );
        (env, worker, dir)
    }

    #[test]
    fn calls_before_load_are_rejected() {
        let env = Environment::new(Arc::new(MemoryParamStore::new()));
        assert!(matches!(env.set_pause(true), Err(EnvError::NotLoaded)));
        assert!(matches!(env.reset(), Err(EnvError::NotLoaded)));
        assert!(matches!(env.with_data(|_, _| ()), Err(EnvError::NotLoaded)));
    }

    #[test]
    fn shutdown_before_run_skips_stepping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_joints.xml");
        std::fs::write(&path, TWO_JOINTS).unwrap();

        let env = Environment::new(Arc::new(MemoryParamStore::new()));
        env.request_shutdown().unwrap();
        env.run(&path).unwrap();
        assert_eq!(env.state(), RunState::Terminated);
        assert_eq!(env.clock().steps(), 0);
    }

    #[test]
    fn pause_flag_round_trip() {
        let store = Arc::new(MemoryParamStore::new());
        let (env, worker, _dir) = start_paused(&store);
        assert!(env.is_paused());

        env.set_pause(false).unwrap();
        assert_eq!(
            env.wait_for(|s| s == RunState::Running, Duration::from_secs(10)),
            Some(RunState::Running)
        );
        env.set_pause(true).unwrap();
        env.set_pause(true).unwrap();
        assert_eq!(
            env.wait_for(|s| s == RunState::Paused, Duration::from_secs(10)),
            Some(RunState::Paused)
        );

        env.request_shutdown().unwrap();
        worker.join().unwrap().unwrap();
    }

    #[test]
    fn reset_applies_current_maps() {
        let store = Arc::new(MemoryParamStore::new());
        let (env, worker, _dir) = start_paused(&store);

        env.with_data_mut(|_, data| {
            data.qpos[1] = 0.75;
        })
        .unwrap();
        store.set(POSITIONS_KEY, json!({"joint0": -0.314, "missing": 3.0}));
        store.set(VELOCITIES_KEY, json!({"joint0": 1.05}));

        let report = env.reset().unwrap();
        assert_eq!(report.unknown_positions, vec!["missing".to_string()]);

        let (q, v) = env
            .with_data(|_, data| (data.qpos.clone(), data.qvel.clone()))
            .unwrap();
        assert_eq!(q.as_slice(), &[-0.314, 0.75]);
        assert_eq!(v.as_slice(), &[1.05, 0.0]);
        assert_eq!(env.state(), RunState::Paused);

        env.request_shutdown().unwrap();
        worker.join().unwrap().unwrap();
    }

    #[test]
    fn restore_defaults_policy_zeroes_unlisted() {
        let store = Arc::new(MemoryParamStore::new());
        store.set("reset_policy", "restore_defaults");
        let (env, worker, _dir) = start_paused(&store);

        env.with_data_mut(|_, data| {
            data.qpos[1] = 0.75;
            data.qvel[1] = 2.0;
        })
        .unwrap();
        store.set(POSITIONS_KEY, json!({"joint0": 0.5}));
        env.reset().unwrap();

        let q = env.with_data(|_, data| data.qpos.clone()).unwrap();
        let v = env.with_data(|_, data| data.qvel.clone()).unwrap();
        assert_eq!(q.as_slice(), &[0.5, 0.0]);
        assert_eq!(v.as_slice(), &[0.0, 0.0]);

        env.request_shutdown().unwrap();
        worker.join().unwrap().unwrap();
    }

    #[test]
    fn calls_after_termination_are_invalid() {
        let store = Arc::new(MemoryParamStore::new());
        let (env, worker, _dir) = start_paused(&store);
        env.request_shutdown().unwrap();
        worker.join().unwrap().unwrap();

        assert_eq!(env.state(), RunState::Terminated);
        assert!(matches!(env.set_pause(false), Err(EnvError::InvalidControlCall)));
        assert!(matches!(env.reset(), Err(EnvError::InvalidControlCall)));
        assert!(matches!(env.request_shutdown(), Err(EnvError::InvalidControlCall)));
        assert!(matches!(env.with_data(|_, _| ()), Err(EnvError::NotLoaded)));
        assert!(env.model().is_none());
    }
}
