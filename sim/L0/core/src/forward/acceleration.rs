//! Gravity bias, diagonal joint-space inertia, and acceleration solve.
//!
//! Each DOF sees only the mass of the body its joint moves. With `M` diagonal
//! the solve `M·qacc = qfrc_applied + qfrc_actuator + qfrc_passive - qfrc_bias`
//! is a per-DOF division.

use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};

use crate::joint_visitor::{JointContext, JointVisitor};
use crate::types::{Data, Model};

/// Inertia below this is treated as massless: the DOF gets zero acceleration.
pub(crate) const MJ_MINVAL: f64 = 1e-15;

/// Compute `qfrc_bias`, `qm_diag`, and `qacc`.
pub(crate) fn mj_fwd_acceleration(model: &Model, data: &mut Data) {
    let mut visitor = InertiaGravityVisitor { model, data };
    model.visit_joints(&mut visitor);

    for dof in 0..model.nv {
        let force = data.qfrc_applied[dof] + data.qfrc_actuator[dof] + data.qfrc_passive[dof]
            - data.qfrc_bias[dof];
        let m = data.qm_diag[dof];
        data.qacc[dof] = if m > MJ_MINVAL { force / m } else { 0.0 };
    }
}

struct InertiaGravityVisitor<'a> {
    model: &'a Model,
    data: &'a mut Data,
}

impl InertiaGravityVisitor<'_> {
    /// Lever arm from joint anchor to body COM, body frame.
    fn lever(&self, ctx: &JointContext) -> Vector3<f64> {
        self.model.body_ipos[ctx.body_id] - self.model.jnt_pos[ctx.jnt_id]
    }

    fn weight(&self, ctx: &JointContext) -> Vector3<f64> {
        self.model.gravity * self.model.body_mass[ctx.body_id]
    }

    fn quat_at(&self, adr: usize) -> UnitQuaternion<f64> {
        let q = &self.data.qpos;
        UnitQuaternion::from_quaternion(Quaternion::new(q[adr], q[adr + 1], q[adr + 2], q[adr + 3]))
    }
}

impl JointVisitor for InertiaGravityVisitor<'_> {
    fn visit_hinge(&mut self, ctx: JointContext) {
        let axis = Unit::new_normalize(self.model.jnt_axis[ctx.jnt_id]);
        let a = axis.into_inner();
        let r = self.lever(&ctx);
        let m = self.model.body_mass[ctx.body_id];
        let inertia = &self.model.body_inertia[ctx.body_id];

        let r_perp = r - a * a.dot(&r);
        let i_axis = a.component_mul(&a).dot(inertia);
        self.data.qm_diag[ctx.dof_adr] =
            m * r_perp.norm_squared() + i_axis + self.model.jnt_armature[ctx.jnt_id];

        let rot = UnitQuaternion::from_axis_angle(&axis, self.data.qpos[ctx.qpos_adr]);
        let torque = a.dot(&(rot * r).cross(&self.weight(&ctx)));
        self.data.qfrc_bias[ctx.dof_adr] = -torque;
    }

    fn visit_slide(&mut self, ctx: JointContext) {
        let axis = self.model.jnt_axis[ctx.jnt_id].normalize();
        self.data.qm_diag[ctx.dof_adr] =
            self.model.body_mass[ctx.body_id] + self.model.jnt_armature[ctx.jnt_id];
        self.data.qfrc_bias[ctx.dof_adr] = -axis.dot(&self.weight(&ctx));
    }

    fn visit_ball(&mut self, ctx: JointContext) {
        let r = self.lever(&ctx);
        let m = self.model.body_mass[ctx.body_id];
        let inertia = self.model.body_inertia[ctx.body_id];
        let armature = self.model.jnt_armature[ctx.jnt_id];

        // Parallel-axis shift to the joint anchor, per local axis
        let r2 = r.norm_squared();
        for k in 0..3 {
            self.data.qm_diag[ctx.dof_adr + k] = inertia[k] + m * (r2 - r[k] * r[k]) + armature;
        }

        // Ball qvel is in the local frame; express gravity torque there too
        let rot = self.quat_at(ctx.qpos_adr);
        let torque_world = (rot * r).cross(&self.weight(&ctx));
        let torque_local = rot.inverse() * torque_world;
        for k in 0..3 {
            self.data.qfrc_bias[ctx.dof_adr + k] = -torque_local[k];
        }
    }

    fn visit_free(&mut self, ctx: JointContext) {
        let m = self.model.body_mass[ctx.body_id];
        let inertia = self.model.body_inertia[ctx.body_id];
        let armature = self.model.jnt_armature[ctx.jnt_id];
        let weight = self.weight(&ctx);

        for k in 0..3 {
            self.data.qm_diag[ctx.dof_adr + k] = m + armature;
            self.data.qfrc_bias[ctx.dof_adr + k] = -weight[k];
            self.data.qm_diag[ctx.dof_adr + 3 + k] = inertia[k] + armature;
            self.data.qfrc_bias[ctx.dof_adr + 3 + k] = 0.0;
        }
    }
}
