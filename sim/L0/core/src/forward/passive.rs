//! Passive forces: joint springs and dampers.
//!
//! Springs act on hinge/slide joints only; dampers act on every DOF.

use crate::joint_visitor::{JointContext, JointVisitor};
use crate::types::{Data, Model};

/// Compute `qfrc_passive` from joint stiffness and damping.
pub(crate) fn mj_fwd_passive(model: &Model, data: &mut Data) {
    data.qfrc_passive.fill(0.0);
    let mut visitor = PassiveVisitor { model, data };
    model.visit_joints(&mut visitor);
}

struct PassiveVisitor<'a> {
    model: &'a Model,
    data: &'a mut Data,
}

impl PassiveVisitor<'_> {
    fn scalar(&mut self, ctx: JointContext) {
        let j = ctx.jnt_id;
        let q = self.data.qpos[ctx.qpos_adr];
        let v = self.data.qvel[ctx.dof_adr];
        self.data.qfrc_passive[ctx.dof_adr] = -self.model.jnt_stiffness[j]
            * (q - self.model.jnt_springref[j])
            - self.model.jnt_damping[j] * v;
    }

    fn damping_only(&mut self, ctx: JointContext) {
        let b = self.model.jnt_damping[ctx.jnt_id];
        for k in 0..ctx.nv {
            let dof = ctx.dof_adr + k;
            self.data.qfrc_passive[dof] = -b * self.data.qvel[dof];
        }
    }
}

impl JointVisitor for PassiveVisitor<'_> {
    fn visit_hinge(&mut self, ctx: JointContext) {
        self.scalar(ctx);
    }

    fn visit_slide(&mut self, ctx: JointContext) {
        self.scalar(ctx);
    }

    fn visit_ball(&mut self, ctx: JointContext) {
        self.damping_only(ctx);
    }

    fn visit_free(&mut self, ctx: JointContext) {
        self.damping_only(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn spring_pulls_toward_springref() {
        let mut model = Model::n_link_pendulum(1, 1.0, 1.0);
        model.jnt_stiffness[0] = 10.0;
        model.jnt_springref[0] = 0.5;
        model.jnt_damping[0] = 2.0;

        let mut data = model.make_data();
        data.qpos[0] = 1.0;
        data.qvel[0] = 3.0;
        mj_fwd_passive(&model, &mut data);

        // -10 * (1.0 - 0.5) - 2 * 3
        assert_relative_eq!(data.qfrc_passive[0], -11.0, epsilon = 1e-12);
    }
}
