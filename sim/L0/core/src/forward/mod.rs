//! Forward dynamics pipeline.
//!
//! This module implements `step` and `forward` on `Data`, which call the
//! sub-modules in pipeline order: actuation, passive forces, then
//! acceleration. Each DOF is treated as decoupled from the rest of the
//! chain (diagonal joint-space inertia), which is exact for single-joint
//! bodies hanging off the world and a stable approximation otherwise.

mod acceleration;
mod actuation;
mod passive;

pub(crate) use acceleration::mj_fwd_acceleration;
pub(crate) use actuation::mj_fwd_actuation;
pub(crate) use passive::mj_fwd_passive;

use crate::types::{Data, Model, StepError};

impl Data {
    /// Perform one simulation step.
    ///
    /// Runs [`forward`](Self::forward) and then [`integrate`](Self::integrate),
    /// advancing `nstep` by one and `time` by exactly one `timestep`.
    ///
    /// # Errors
    ///
    /// Returns `Err(StepError)` if:
    /// - Timestep is invalid
    /// - Any qpos/qvel coordinate is NaN or infinite after integration
    pub fn step(&mut self, model: &Model) -> Result<(), StepError> {
        // !(x > 0) also rejects NaN
        if !(model.timestep > 0.0) || !model.timestep.is_finite() {
            return Err(StepError::InvalidTimestep);
        }

        self.forward(model);
        self.integrate(model);

        if let Some(index) = first_non_finite(self) {
            return Err(StepError::Diverged {
                nstep: self.nstep,
                index,
            });
        }
        Ok(())
    }

    /// Compute `qacc` from the current `qpos`, `qvel`, and `ctrl`.
    ///
    /// Does not modify state variables.
    pub fn forward(&mut self, model: &Model) {
        mj_fwd_actuation(model, self);
        mj_fwd_passive(model, self);
        mj_fwd_acceleration(model, self);
    }
}

fn first_non_finite(data: &Data) -> Option<usize> {
    data.qpos
        .iter()
        .position(|v| !v.is_finite())
        .or_else(|| data.qvel.iter().position(|v| !v.is_finite()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn invalid_timestep_rejected() {
        let mut model = Model::n_link_pendulum(1, 1.0, 1.0);
        let mut data = model.make_data();

        model.timestep = 0.0;
        assert_eq!(data.step(&model), Err(StepError::InvalidTimestep));

        model.timestep = f64::NAN;
        assert_eq!(data.step(&model), Err(StepError::InvalidTimestep));

        assert_eq!(data.nstep, 0, "rejected steps must not advance time");
    }

    #[test]
    fn divergence_reported() {
        let model = Model::n_link_pendulum(1, 1.0, 1.0);
        let mut data = model.make_data();
        data.qvel[0] = f64::INFINITY;

        let err = data.step(&model).unwrap_err();
        assert!(matches!(err, StepError::Diverged { .. }));
    }
}
