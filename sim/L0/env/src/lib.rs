//! Single-environment simulation runtime.
//!
//! Loads an MJCF model, steps it on a dedicated thread, and exposes
//! pause, reset, and shutdown to other threads. Startup settings and
//! initial joint states come from a [`ParamStore`].
//!
//! # Architecture
//!
//! ```text
//!  ParamStore ──▶ EnvConfig, JointOverrides
//!                        │
//!                        ▼
//!  run(path) ──▶ load ──▶ initial_state::apply ──▶ stepping loop ──▶ SimClock
//!                                   ▲                    ▲
//!                                   │ reset              │ pause / shutdown
//!                                   └──── control surface / services
//! ```
//!
//! Model and state live behind one mutex shared by the stepping thread and
//! the control surface; a condition variable wakes the loop when a flag
//! changes. There is no global instance: every entry point takes an
//! [`Environment`] handle.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sim_env::{Environment, MemoryParamStore, RunState};
//!
//! let params = Arc::new(MemoryParamStore::new());
//! params.set("num_steps", 100);
//! params.set("initial_joint_positions/joint_map", serde_json::json!({"joint0": -0.314}));
//!
//! let env = Environment::new(params);
//! let worker = {
//!     let env = env.clone();
//!     std::thread::spawn(move || env.run("pendulum_world.xml"))
//! };
//!
//! env.wait_for(|s| s == RunState::HaltedByBudget, Duration::from_secs(5));
//! assert_eq!(env.clock().steps(), 100);
//!
//! env.request_shutdown()?;
//! worker.join().expect("stepping thread panicked")?;
//! # Ok::<(), sim_env::EnvError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/sim-env/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

mod clock;
mod config;
mod control;
mod environment;
mod error;
mod params;
mod stepping;

pub mod initial_state;
pub mod services;

pub use clock::SimClock;
pub use config::{
    EXIT_ON_BUDGET_KEY, EnvConfig, NUM_STEPS_KEY, REAL_TIME_FACTOR_KEY, RESET_POLICY_KEY,
    ResetPolicy, UNPAUSE_KEY,
};
pub use environment::{Environment, RunState, load};
pub use error::{ConfigError, EnvError, LoadError, Result};
pub use initial_state::{ApplyReport, JointOverrides, POSITIONS_KEY, VELOCITIES_KEY};
pub use params::{MemoryParamStore, ParamStore};
