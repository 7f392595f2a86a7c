//! Position update on the configuration manifold.
//!
//! Hinge and slide coordinates advance linearly. Ball and free orientations
//! are advanced by the exponential map of the body-frame angular velocity and
//! renormalized afterwards, so `qpos` always holds unit quaternions.

use nalgebra::{DVector, Quaternion, Unit, UnitQuaternion, Vector3};

use crate::joint_visitor::{JointContext, JointVisitor};
use crate::types::{Data, Model};

/// Rotation angles below this are treated as no rotation.
const MIN_ANGLE: f64 = 1e-10;

/// Advance `qpos` by `qvel * h` for every joint.
pub fn mj_integrate_pos(model: &Model, data: &mut Data, h: f64) {
    let mut visitor = PositionStep {
        qpos: &mut data.qpos,
        qvel: &data.qvel,
        h,
    };
    model.visit_joints(&mut visitor);
}

/// Clamp limited hinge and slide joints into their range.
///
/// A clamped joint loses any velocity component that points further out of
/// range.
pub fn mj_enforce_limits(model: &Model, data: &mut Data) {
    for jnt_id in 0..model.njnt {
        if !model.jnt_limited[jnt_id] || model.jnt_type[jnt_id].uses_quaternion() {
            continue;
        }
        let (lo, hi) = model.jnt_range[jnt_id];
        let q = model.jnt_qpos_adr[jnt_id];
        let v = model.jnt_dof_adr[jnt_id];

        if data.qpos[q] < lo {
            data.qpos[q] = lo;
            data.qvel[v] = data.qvel[v].max(0.0);
        } else if data.qpos[q] > hi {
            data.qpos[q] = hi;
            data.qvel[v] = data.qvel[v].min(0.0);
        }
    }
}

/// Renormalize every ball and free quaternion in `qpos`.
///
/// A degenerate quaternion is replaced by the identity.
pub fn mj_normalize_quat(model: &Model, data: &mut Data) {
    let mut visitor = QuatNormalize {
        qpos: &mut data.qpos,
    };
    model.visit_joints(&mut visitor);
}

struct PositionStep<'a> {
    qpos: &'a mut DVector<f64>,
    qvel: &'a DVector<f64>,
    h: f64,
}

impl PositionStep<'_> {
    fn linear(&mut self, qpos_adr: usize, dof_adr: usize, n: usize) {
        for i in 0..n {
            self.qpos[qpos_adr + i] += self.qvel[dof_adr + i] * self.h;
        }
    }

    fn rotate(&mut self, qpos_adr: usize, dof_adr: usize) {
        let omega = Vector3::new(
            self.qvel[dof_adr],
            self.qvel[dof_adr + 1],
            self.qvel[dof_adr + 2],
        );
        let speed = omega.norm();
        let angle = speed * self.h;
        if angle <= MIN_ANGLE {
            return;
        }

        let q = read_quat(self.qpos, qpos_adr);
        let dq = UnitQuaternion::from_axis_angle(&Unit::new_unchecked(omega / speed), angle);
        write_quat(self.qpos, qpos_adr, &(q * dq));
    }
}

impl JointVisitor for PositionStep<'_> {
    fn visit_hinge(&mut self, ctx: JointContext) {
        self.linear(ctx.qpos_adr, ctx.dof_adr, 1);
    }

    fn visit_slide(&mut self, ctx: JointContext) {
        self.linear(ctx.qpos_adr, ctx.dof_adr, 1);
    }

    fn visit_ball(&mut self, ctx: JointContext) {
        self.rotate(ctx.qpos_adr, ctx.dof_adr);
    }

    fn visit_free(&mut self, ctx: JointContext) {
        self.linear(ctx.qpos_adr, ctx.dof_adr, 3);
        self.rotate(ctx.qpos_adr + 3, ctx.dof_adr + 3);
    }
}

struct QuatNormalize<'a> {
    qpos: &'a mut DVector<f64>,
}

impl QuatNormalize<'_> {
    fn normalize_at(&mut self, adr: usize) {
        let raw = Quaternion::new(
            self.qpos[adr],
            self.qpos[adr + 1],
            self.qpos[adr + 2],
            self.qpos[adr + 3],
        );
        let unit = UnitQuaternion::try_new(raw, MIN_ANGLE).unwrap_or_else(UnitQuaternion::identity);
        write_quat(self.qpos, adr, &unit);
    }
}

impl JointVisitor for QuatNormalize<'_> {
    fn visit_ball(&mut self, ctx: JointContext) {
        self.normalize_at(ctx.qpos_adr);
    }

    fn visit_free(&mut self, ctx: JointContext) {
        self.normalize_at(ctx.qpos_adr + 3);
    }
}

// qpos stores quaternions as [w, x, y, z].
fn read_quat(qpos: &DVector<f64>, adr: usize) -> UnitQuaternion<f64> {
    UnitQuaternion::from_quaternion(Quaternion::new(
        qpos[adr],
        qpos[adr + 1],
        qpos[adr + 2],
        qpos[adr + 3],
    ))
}

fn write_quat(qpos: &mut DVector<f64>, adr: usize, q: &UnitQuaternion<f64>) {
    qpos[adr] = q.w;
    qpos[adr + 1] = q.i;
    qpos[adr + 2] = q.j;
    qpos[adr + 3] = q.k;
}
