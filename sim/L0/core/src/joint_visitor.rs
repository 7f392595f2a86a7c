//! Joint visitor pattern.
//!
//! [`Model::visit_joints()`] is the one place joint addresses are computed.
//! Forward dynamics and position integration both go through it, so a new
//! joint type is a compile error everywhere it matters.

use crate::types::{MjJointType, Model};

/// Per-joint addresses and metadata handed to a [`JointVisitor`].
#[derive(Debug, Clone, Copy)]
pub struct JointContext {
    /// Joint index in model arrays.
    pub jnt_id: usize,
    /// Joint type (Hinge, Slide, Ball, Free).
    pub jnt_type: MjJointType,
    /// Body moved by this joint.
    pub body_id: usize,
    /// Starting index in qvel/qacc/qfrc arrays (DOF address).
    pub dof_adr: usize,
    /// Starting index in qpos array (position address).
    pub qpos_adr: usize,
    /// Number of velocity DOFs for this joint.
    pub nv: usize,
    /// Number of position coordinates for this joint.
    pub nq: usize,
}

/// Visitor over the joints of a [`Model`], one method per joint type.
///
/// All methods default to no-ops.
///
/// ```ignore
/// struct CountHinges(usize);
///
/// impl JointVisitor for CountHinges {
///     fn visit_hinge(&mut self, _ctx: JointContext) {
///         self.0 += 1;
///     }
/// }
///
/// let mut count = CountHinges(0);
/// model.visit_joints(&mut count);
/// ```
pub trait JointVisitor {
    /// Called for each Hinge joint (1 DOF revolute).
    #[inline]
    fn visit_hinge(&mut self, _ctx: JointContext) {}

    /// Called for each Slide joint (1 DOF prismatic).
    #[inline]
    fn visit_slide(&mut self, _ctx: JointContext) {}

    /// Called for each Ball joint (3 DOF spherical, quaternion orientation).
    #[inline]
    fn visit_ball(&mut self, _ctx: JointContext) {}

    /// Called for each Free joint (6 DOF floating base).
    #[inline]
    fn visit_free(&mut self, _ctx: JointContext) {}
}

impl Model {
    /// Iterate over all joints in index order with the visitor pattern.
    #[inline]
    pub fn visit_joints<V: JointVisitor>(&self, visitor: &mut V) {
        for jnt_id in 0..self.njnt {
            let jnt_type = self.jnt_type[jnt_id];
            let ctx = JointContext {
                jnt_id,
                jnt_type,
                body_id: self.jnt_body[jnt_id],
                dof_adr: self.jnt_dof_adr[jnt_id],
                qpos_adr: self.jnt_qpos_adr[jnt_id],
                nv: jnt_type.nv(),
                nq: jnt_type.nq(),
            };

            match jnt_type {
                MjJointType::Hinge => visitor.visit_hinge(ctx),
                MjJointType::Slide => visitor.visit_slide(ctx),
                MjJointType::Ball => visitor.visit_ball(ctx),
                MjJointType::Free => visitor.visit_free(ctx),
            }
        }
    }
}
