//! The environment handle and the state it shares with its stepping thread.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use sim_core::{Data, Model};
use tracing::{debug, info, warn};

use crate::clock::SimClock;
use crate::config::EnvConfig;
use crate::error::LoadError;
use crate::initial_state::{self, ApplyReport, JointOverrides};
use crate::params::ParamStore;

/// Load a model file and allocate its default state.
///
/// # Errors
///
/// Returns [`LoadError::Model`] if the file is missing, unreadable,
/// unparsable, or structurally invalid.
pub fn load<P: AsRef<Path>>(path: P) -> Result<(Arc<Model>, Data), LoadError> {
    let path = path.as_ref();
    let model = sim_mjcf::load_model_from_file(path)?;
    let data = model.make_data();
    info!(
        path = %path.display(),
        model = %model.name,
        njnt = model.njnt,
        nq = model.nq,
        nv = model.nv,
        timestep = model.timestep,
        "model loaded"
    );
    Ok((Arc::new(model), data))
}

/// Lifecycle of an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Created, [`Environment::run`] not yet called.
    Idle,
    /// Loading the model and applying initial overrides.
    Initializing,
    /// Stepping.
    Running,
    /// Loaded, time frozen until unpaused.
    Paused,
    /// Step budget spent; time frozen until shutdown.
    HaltedByBudget,
    /// Shutdown observed; the loop is unwinding.
    ShuttingDown,
    /// The loop has returned. Final.
    Terminated,
}

impl RunState {
    /// Whether control calls are honored in this state.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused | Self::HaltedByBudget)
    }

    /// Whether initialization has finished, successfully or not.
    #[must_use]
    pub fn is_past_initializing(self) -> bool {
        !matches!(self, Self::Idle | Self::Initializing)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::HaltedByBudget => "halted_by_budget",
            Self::ShuttingDown => "shutting_down",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Handle to one simulation environment.
///
/// Clones share the same environment. One thread calls
/// [`run`](Self::run), which loads the model and steps until shutdown;
/// every other thread drives it through the control methods.
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use sim_env::{Environment, MemoryParamStore};
///
/// let env = Environment::new(Arc::new(MemoryParamStore::new()));
/// let worker = {
///     let env = env.clone();
///     std::thread::spawn(move || env.run("pendulum.xml"))
/// };
///
/// env.wait_until_loaded(Duration::from_secs(5));
/// env.set_pause(true).ok();
/// println!("t = {}", env.clock().now());
/// env.request_shutdown().ok();
/// worker.join().expect("stepping thread panicked")?;
/// # Ok::<(), sim_env::EnvError>(())
/// ```
#[derive(Clone)]
pub struct Environment {
    pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
    pub(crate) params: Arc<dyn ParamStore>,
    pub(crate) shared: Mutex<Shared>,
    pub(crate) changed: Condvar,
    pub(crate) clock: SimClock,
}

/// Everything the stepping thread and control callers must agree on.
pub(crate) struct Shared {
    pub(crate) state: RunState,
    pub(crate) paused: bool,
    pub(crate) shutdown_requested: bool,
    pub(crate) remaining_steps: Option<u64>,
    pub(crate) config: EnvConfig,
    pub(crate) sim: Option<Sim>,
}

pub(crate) struct Sim {
    pub(crate) model: Arc<Model>,
    pub(crate) data: Data,
}

impl Environment {
    /// New idle environment reading configuration from `params`.
    #[must_use]
    pub fn new(params: Arc<dyn ParamStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                params,
                shared: Mutex::new(Shared {
                    state: RunState::Idle,
                    paused: false,
                    shutdown_requested: false,
                    remaining_steps: None,
                    config: EnvConfig::default(),
                    sim: None,
                }),
                changed: Condvar::new(),
                clock: SimClock::new(),
            }),
        }
    }

    /// Parameter store this environment reads.
    #[must_use]
    pub fn params(&self) -> &dyn ParamStore {
        &*self.inner.params
    }

    /// Simulated-time observer.
    #[must_use]
    pub fn clock(&self) -> SimClock {
        self.inner.clock.clone()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn wait<'a>(&self, guard: MutexGuard<'a, Shared>) -> MutexGuard<'a, Shared> {
        self.inner
            .changed
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to `next` and wake everyone waiting on the state.
    pub(crate) fn transition(&self, shared: &mut Shared, next: RunState) {
        if shared.state == next {
            return;
        }
        match next {
            RunState::Running | RunState::Paused | RunState::Initializing => {
                debug!(from = %shared.state, to = %next, "state change");
            }
            _ => info!(
                from = %shared.state,
                to = %next,
                time = self.inner.clock.now(),
                steps = self.inner.clock.steps(),
                "state change"
            ),
        }
        shared.state = next;
        self.inner.changed.notify_all();
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.lock();
        f.debug_struct("Environment")
            .field("state", &shared.state)
            .field("paused", &shared.paused)
            .field("remaining_steps", &shared.remaining_steps)
            .field("time", &self.inner.clock.now())
            .finish_non_exhaustive()
    }
}

/// Apply `overrides`, warning about names that match no joint.
pub(crate) fn apply_overrides(
    model: &Model,
    data: &mut Data,
    overrides: &JointOverrides,
) -> ApplyReport {
    if overrides.is_empty() {
        debug!("no joint overrides configured");
        return ApplyReport::default();
    }
    let report = initial_state::apply(model, data, overrides);
    for name in &report.unknown_positions {
        warn!(joint = %name, "position override names no joint in the model; skipped");
    }
    for name in &report.unknown_velocities {
        warn!(joint = %name, "velocity override names no joint in the model; skipped");
    }
    report
}
