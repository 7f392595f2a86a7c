//! Data struct definition and core accessor methods.
//!
//! [`Data`] is the dynamic simulation state: generalized coordinates (qpos,
//! qvel), computed force terms, and time. It is the mutable counterpart to
//! [`Model`]; one `Data` is created per simulation via `model.make_data()`.

use nalgebra::DVector;

use super::model::Model;

/// Dynamic simulation state (like mjData).
///
/// All arrays pre-allocated - no heap allocation during simulation.
///
/// # Key Invariant
///
/// `qpos` and `qvel` are the ONLY state variables. Everything else
/// (qacc, qfrc_*) is COMPUTED from them by [`Data::forward`]. `time` is
/// derived from the step counter: `time == nstep * model.timestep`.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    // ==================== Generalized Coordinates (THE source of truth) ====================
    /// Joint positions (length `nq`) - includes quaternion components for ball/free joints.
    pub qpos: DVector<f64>,
    /// Joint velocities (length `nv`).
    pub qvel: DVector<f64>,
    /// Joint accelerations (length `nv`) - computed by forward dynamics.
    pub qacc: DVector<f64>,

    // ==================== Control / Actuation ====================
    /// Actuator control inputs (length `nu`).
    pub ctrl: DVector<f64>,
    /// Actuator forces in joint space (length `nv`).
    pub qfrc_actuator: DVector<f64>,

    // ==================== Forces in Generalized Coordinates ====================
    /// User-applied generalized forces (length `nv`).
    pub qfrc_applied: DVector<f64>,
    /// Gravity bias forces (length `nv`), sign convention `M·qacc = f - bias`.
    pub qfrc_bias: DVector<f64>,
    /// Passive forces (springs + dampers) (length `nv`).
    pub qfrc_passive: DVector<f64>,
    /// Effective (diagonal) joint-space inertia per DOF (length `nv`).
    pub qm_diag: DVector<f64>,

    // ==================== Time ====================
    /// Number of steps taken since the data was created.
    pub nstep: u64,
    /// Simulation time in seconds.
    pub time: f64,
}

impl Data {
    /// Restore `qpos0` and zero velocities, leaving time and controls untouched.
    pub fn reset_joint_state(&mut self, model: &Model) {
        self.qpos.copy_from(&model.qpos0);
        self.qvel.fill(0.0);
        self.qacc.fill(0.0);
    }

    /// Whether every position and velocity coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.qpos.iter().chain(self.qvel.iter()).all(|v| v.is_finite())
    }
}
