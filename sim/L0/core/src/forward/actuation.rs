//! Actuation: motor transmissions from `ctrl` to joint-space forces.

use crate::types::{Data, Model};

/// Compute `qfrc_actuator = Σ gear · ctrl` on each actuator's first DOF.
pub(crate) fn mj_fwd_actuation(model: &Model, data: &mut Data) {
    data.qfrc_actuator.fill(0.0);
    for i in 0..model.nu {
        let dof = model.jnt_dof_adr[model.actuator_trnid[i]];
        data.qfrc_actuator[dof] += model.actuator_gear[i] * data.ctrl[i];
    }
}
