//! Shared model paths and environment launch helpers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sim_env::{Environment, MemoryParamStore, Result, RunState};

/// Generous bound for state transitions on a loaded CI machine.
pub const TRANSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// Empty world with `timestep = 0.001`.
pub fn empty_world() -> PathBuf {
    asset("empty_world.xml")
}

/// Two-link hinge pendulum (`joint0`, `joint1`) plus a slider (`joint2`),
/// `timestep = 0.001`.
pub fn pendulum_world() -> PathBuf {
    asset("pendulum_world.xml")
}

fn asset(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(name)
}

/// An environment running on its own thread.
pub struct Running {
    pub env: Environment,
    pub params: Arc<MemoryParamStore>,
    worker: Option<JoinHandle<Result<()>>>,
}

impl Running {
    /// Spawn `run(model)` and wait until initialization finished.
    pub fn start(model: PathBuf, params: Arc<MemoryParamStore>) -> Self {
        let env = Environment::new(params.clone());
        let worker = {
            let env = env.clone();
            thread::spawn(move || env.run(model))
        };
        let state = env.wait_until_loaded(TRANSITION_TIMEOUT);
        assert!(state.is_some(), "environment did not finish loading");
        Self {
            env,
            params,
            worker: Some(worker),
        }
    }

    /// Block until the state satisfies `pred`.
    pub fn wait_for(&self, pred: impl Fn(RunState) -> bool) -> RunState {
        self.env
            .wait_for(pred, TRANSITION_TIMEOUT)
            .expect("timed out waiting for state change")
    }

    /// Join the stepping thread without requesting shutdown.
    pub fn join(mut self) -> Result<()> {
        let worker = self.worker.take().expect("already joined");
        worker.join().expect("stepping thread panicked")
    }

    /// Request shutdown and join.
    pub fn shutdown(self) -> Result<()> {
        self.env.request_shutdown()?;
        self.join()
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        // A failed assertion must not leave the stepping thread spinning.
        if let Some(worker) = self.worker.take() {
            let _ = self.env.request_shutdown();
            let _ = worker.join();
        }
    }
}

/// Parameter store with the given `unpause` flag.
pub fn params(unpause: bool) -> Arc<MemoryParamStore> {
    let params = Arc::new(MemoryParamStore::new());
    params.set("unpause", unpause);
    params
}
