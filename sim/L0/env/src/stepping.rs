//! The stepping loop: the one thread that owns state mutation.
//!
//! ```text
//! Idle ─run─▶ Initializing ─┬─▶ Running ⇄ Paused ─┐
//!                │          │      │               │
//!                │          │      ▼ budget        │ shutdown
//!                │          │  HaltedByBudget ─────┤
//!                │          │                      ▼
//!                │          └──────────────▶ ShuttingDown
//!                │                                 │
//!                └─ load error ───────────▶ Terminated ◀┘
//! ```
//!
//! Flags are only looked at between steps. A step runs under the lock and
//! always completes; real-time pacing sleeps with the lock released.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::EnvConfig;
use crate::environment::{Environment, RunState, Shared, Sim, apply_overrides, load};
use crate::error::{EnvError, LoadError, Result};
use crate::initial_state::JointOverrides;

impl Environment {
    /// Load `path` and step it until shutdown is requested.
    ///
    /// Blocks the calling thread for the lifetime of the simulation; run it
    /// on a dedicated thread and drive it from others. Returns once the
    /// environment reaches [`RunState::Terminated`].
    ///
    /// # Errors
    ///
    /// - [`EnvError::AlreadyStarted`] if this environment was run before
    /// - [`EnvError::Load`] if the model or startup parameters are invalid
    /// - [`EnvError::Step`] if the physics step fails
    pub fn run<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        {
            let mut shared = self.lock();
            if shared.state != RunState::Idle {
                return Err(EnvError::AlreadyStarted);
            }
            self.transition(&mut shared, RunState::Initializing);
        }

        let result = self.initialize(path.as_ref()).and_then(|()| self.step_loop());

        let mut shared = self.lock();
        shared.sim = None;
        if let Err(err) = &result {
            error!(error = %err, "environment stopped");
        }
        self.transition(&mut shared, RunState::Terminated);
        result
    }

    fn initialize(&self, path: &Path) -> Result<()> {
        let (model, mut data) = load(path)?;
        let config = EnvConfig::from_store(self.params()).map_err(LoadError::from)?;
        let overrides = JointOverrides::from_store(self.params()).map_err(LoadError::from)?;

        let report = apply_overrides(&model, &mut data, &overrides);
        self.inner.clock.start(model.timestep, data.nstep);

        info!(
            paused = config.initially_paused(),
            num_steps = ?config.num_steps,
            real_time_factor = config.real_time_factor,
            overrides = report.applied,
            "environment initialized"
        );

        let mut shared = self.lock();
        shared.paused = config.initially_paused();
        shared.remaining_steps = config.num_steps;
        let next = if shared.shutdown_requested {
            RunState::ShuttingDown
        } else if config.num_steps == Some(0) {
            budget_exhausted_state(&config)
        } else if shared.paused {
            RunState::Paused
        } else {
            RunState::Running
        };
        shared.config = config;
        shared.sim = Some(Sim { model, data });
        self.transition(&mut shared, next);
        Ok(())
    }

    fn step_loop(&self) -> Result<()> {
        let mut deadline = None;
        loop {
            let period = {
                let mut shared = self.lock();
                // Iteration boundary: honor flags, block while not running.
                loop {
                    if shared.shutdown_requested || shared.state == RunState::ShuttingDown {
                        self.transition(&mut shared, RunState::ShuttingDown);
                        return Ok(());
                    }
                    match shared.state {
                        RunState::Running if shared.paused => {
                            self.transition(&mut shared, RunState::Paused);
                        }
                        RunState::Paused if !shared.paused => {
                            self.transition(&mut shared, RunState::Running);
                        }
                        _ => {}
                    }
                    if shared.state == RunState::Running {
                        break;
                    }
                    deadline = None;
                    shared = self.wait(shared);
                }

                let next = self.step_once(&mut shared)?;
                if let Some(next) = next {
                    self.transition(&mut shared, next);
                    if next == RunState::ShuttingDown {
                        return Ok(());
                    }
                }
                shared
                    .sim
                    .as_ref()
                    .and_then(|sim| shared.config.step_period(sim.model.timestep))
            };

            match period {
                Some(period) => pace(&mut deadline, period),
                // Let control callers at the lock between back-to-back steps.
                None => thread::yield_now(),
            }
        }
    }

    /// One physics step; returns the state to move to if the budget ran out.
    fn step_once(&self, shared: &mut Shared) -> Result<Option<RunState>> {
        let Shared {
            sim,
            remaining_steps,
            config,
            ..
        } = shared;
        let Some(Sim { model, data }) = sim.as_mut() else {
            return Err(EnvError::NotLoaded);
        };

        data.step(model)?;
        self.inner.clock.publish(data.nstep);

        match remaining_steps {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(1);
                Ok((*remaining == 0).then(|| budget_exhausted_state(config)))
            }
            None => Ok(None),
        }
    }
}

fn budget_exhausted_state(config: &EnvConfig) -> RunState {
    if config.exit_on_budget {
        RunState::ShuttingDown
    } else {
        RunState::HaltedByBudget
    }
}

/// Sleep until one `period` after the previous deadline.
///
/// If the loop has fallen behind, the schedule restarts from now instead of
/// bursting to catch up.
fn pace(deadline: &mut Option<Instant>, period: Duration) {
    let now = Instant::now();
    let target = deadline.map_or(now + period, |last| last + period);
    if target > now {
        thread::sleep(target - now);
        *deadline = Some(target);
    } else {
        *deadline = Some(now);
    }
}
