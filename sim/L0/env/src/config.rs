//! Startup configuration read from the parameter store.
//!
//! | Key                | Type                 | Default          |
//! |--------------------|----------------------|------------------|
//! | `unpause`          | bool                 | `true`           |
//! | `num_steps`        | non-negative integer | unbounded        |
//! | `real_time_factor` | non-negative number  | `0` (no pacing)  |
//! | `reset_policy`     | string               | `keep_unlisted`  |
//! | `exit_on_budget`   | bool                 | `false`          |
//!
//! Joint override maps are read separately, see
//! [`JointOverrides`](crate::JointOverrides).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;
use crate::params::ParamStore;

/// Start stepping immediately (`true`) or paused (`false`).
pub const UNPAUSE_KEY: &str = "unpause";
/// Step budget.
pub const NUM_STEPS_KEY: &str = "num_steps";
/// Wall-clock pacing factor.
pub const REAL_TIME_FACTOR_KEY: &str = "real_time_factor";
/// What reset does to joints absent from the override maps.
pub const RESET_POLICY_KEY: &str = "reset_policy";
/// Shut down instead of halting when the step budget runs out.
pub const EXIT_ON_BUDGET_KEY: &str = "exit_on_budget";

/// Treatment of joints not named in the override maps on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Unlisted joints keep their current position and velocity.
    #[default]
    KeepUnlisted,
    /// Unlisted joints go back to `qpos0` with zero velocity.
    RestoreDefaults,
}

impl ResetPolicy {
    fn parse(key: &str, value: &Value) -> Result<Self, ConfigError> {
        match value.as_str() {
            Some("keep_unlisted") => Ok(Self::KeepUnlisted),
            Some("restore_defaults") => Ok(Self::RestoreDefaults),
            _ => Err(ConfigError::wrong_type(
                key,
                "\"keep_unlisted\" or \"restore_defaults\"",
                value,
            )),
        }
    }
}

/// Environment settings captured once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Start running rather than paused.
    pub unpause: bool,
    /// Number of steps to take before halting; `None` is unbounded.
    pub num_steps: Option<u64>,
    /// Simulated seconds per wall-clock second; `0` steps as fast as possible.
    pub real_time_factor: f64,
    /// Reset behavior for joints absent from the override maps.
    pub reset_policy: ResetPolicy,
    /// Shut down once the step budget is spent instead of halting.
    pub exit_on_budget: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            unpause: true,
            num_steps: None,
            real_time_factor: 0.0,
            reset_policy: ResetPolicy::KeepUnlisted,
            exit_on_budget: false,
        }
    }
}

impl EnvConfig {
    /// Read the configuration; absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WrongType`] for any present but ill-typed key.
    pub fn from_store(store: &dyn ParamStore) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            unpause: get_bool(store, UNPAUSE_KEY)?.unwrap_or(defaults.unpause),
            num_steps: get_u64(store, NUM_STEPS_KEY)?,
            real_time_factor: get_non_negative_f64(store, REAL_TIME_FACTOR_KEY)?
                .unwrap_or(defaults.real_time_factor),
            reset_policy: store
                .get(RESET_POLICY_KEY)
                .map(|v| ResetPolicy::parse(RESET_POLICY_KEY, &v))
                .transpose()?
                .unwrap_or(defaults.reset_policy),
            exit_on_budget: get_bool(store, EXIT_ON_BUDGET_KEY)?
                .unwrap_or(defaults.exit_on_budget),
        })
    }

    /// Whether the loop starts in the paused state.
    #[must_use]
    pub fn initially_paused(&self) -> bool {
        !self.unpause
    }

    /// Wall-clock duration of one step, or `None` when pacing is off.
    #[must_use]
    pub fn step_period(&self, timestep: f64) -> Option<Duration> {
        if self.real_time_factor > 0.0 {
            Duration::try_from_secs_f64(timestep / self.real_time_factor).ok()
        } else {
            None
        }
    }
}

fn get_bool(store: &dyn ParamStore, key: &str) -> Result<Option<bool>, ConfigError> {
    store
        .get(key)
        .map(|v| v.as_bool().ok_or_else(|| ConfigError::wrong_type(key, "a boolean", &v)))
        .transpose()
}

fn get_u64(store: &dyn ParamStore, key: &str) -> Result<Option<u64>, ConfigError> {
    store
        .get(key)
        .map(|v| {
            v.as_u64()
                .ok_or_else(|| ConfigError::wrong_type(key, "a non-negative integer", &v))
        })
        .transpose()
}

fn get_non_negative_f64(
    store: &dyn ParamStore,
    key: &str,
) -> Result<Option<f64>, ConfigError> {
    store
        .get(key)
        .map(|v| {
            v.as_f64()
                .filter(|x| x.is_finite() && *x >= 0.0)
                .ok_or_else(|| ConfigError::wrong_type(key, "a non-negative number", &v))
        })
        .transpose()
}
