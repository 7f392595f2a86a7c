//! Semi-implicit Euler integration.
//!
//! Velocity is updated first (`qvel += qacc * h`), then positions are
//! advanced with the new velocity. Limited joints are clamped last.

pub(crate) mod euler;

use crate::types::{Data, Model};

use euler::{mj_enforce_limits, mj_integrate_pos, mj_normalize_quat};

impl Data {
    /// Advance state by one `timestep` using the `qacc` from
    /// [`forward`](Self::forward).
    ///
    /// `time` is recomputed from the step counter rather than accumulated,
    /// so after `n` steps it equals `n * timestep` exactly.
    pub fn integrate(&mut self, model: &Model) {
        let h = model.timestep;

        self.qvel.axpy(h, &self.qacc, 1.0);

        mj_integrate_pos(model, self, h);
        mj_normalize_quat(model, self);
        mj_enforce_limits(model, self);

        self.nstep += 1;
        #[allow(clippy::cast_precision_loss)]
        {
            self.time = self.nstep as f64 * h;
        }
    }
}
