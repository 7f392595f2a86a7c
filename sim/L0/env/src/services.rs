//! Request/response handlers for the pause and reset commands.
//!
//! A transport layer (RPC, message bus, test harness) decodes a request,
//! calls the handler against its [`Environment`], and sends the response
//! back. Handlers never panic and never propagate errors into the stepping
//! thread; failures are logged and reported as `success: false`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::environment::Environment;

/// Pause (`true`) or unpause (`false`) the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetPauseRequest {
    /// Desired pause state.
    pub paused: bool,
}

/// Acknowledgement for [`SetPauseRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetPauseResponse {
    /// Whether the flag was recorded.
    pub success: bool,
}

/// Re-apply the initial joint overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetRequest {}

/// Acknowledgement for [`ResetRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetResponse {
    /// Whether the overrides were applied.
    pub success: bool,
}

/// Handle a pause command.
pub fn set_pause(env: &Environment, request: SetPauseRequest) -> SetPauseResponse {
    match env.set_pause(request.paused) {
        Ok(()) => SetPauseResponse { success: true },
        Err(err) => {
            warn!(paused = request.paused, error = %err, "set_pause rejected");
            SetPauseResponse { success: false }
        }
    }
}

/// Handle a reset command.
pub fn reset(env: &Environment, _request: ResetRequest) -> ResetResponse {
    match env.reset() {
        Ok(_) => ResetResponse { success: true },
        Err(err) => {
            warn!(error = %err, "reset rejected");
            ResetResponse { success: false }
        }
    }
}
