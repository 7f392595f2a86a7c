//! Joint processing.
//!
//! Converts MJCF `<joint>` elements into `Model` joint and DOF arrays,
//! including angle conversion, limit inference, and `qpos0`.

use nalgebra::{UnitQuaternion, Vector3};
use sim_core::MjJointType;
use tracing::warn;

use super::ModelBuilder;
use crate::error::{MjcfError, Result};
use crate::types::{AngleUnit, MjcfJoint, MjcfJointType};

impl ModelBuilder {
    /// Process a joint and add its DOFs.
    ///
    /// `world_pos` and `world_quat` are the owning body's frame at `qpos0`;
    /// the joint anchor and axis are stored rotated into world orientation.
    pub(crate) fn process_joint(
        &mut self,
        joint: &MjcfJoint,
        body_id: usize,
        world_pos: Vector3<f64>,
        world_quat: UnitQuaternion<f64>,
    ) -> Result<usize> {
        let jnt_id = self.model.jnt_type.len();

        let joint_type = joint.joint_type.unwrap_or_default();
        let jnt_type = match joint_type {
            MjcfJointType::Hinge => MjJointType::Hinge,
            MjcfJointType::Slide => MjJointType::Slide,
            MjcfJointType::Ball => MjJointType::Ball,
            MjcfJointType::Free => MjJointType::Free,
            MjcfJointType::Cylindrical | MjcfJointType::Planar => {
                return Err(MjcfError::Unsupported(format!(
                    "joint '{}': type {joint_type:?}",
                    joint.name
                )));
            }
        };

        if !joint.name.is_empty() {
            self.joint_name_to_id.insert(joint.name.clone(), jnt_id);
        }

        let qpos_adr = self.model.nq;
        let dof_adr = self.model.nv;

        let raw_axis = joint.axis.unwrap_or_else(Vector3::z);
        let axis = if raw_axis.norm() > 1e-10 {
            raw_axis.normalize()
        } else {
            warn!(
                joint_name = ?joint.name,
                "Joint axis is zero or near-zero, defaulting to Z-axis"
            );
            Vector3::z()
        };

        let limited = joint
            .limited
            .unwrap_or(self.compiler.autolimits && joint.range.is_some());

        // Hinge range/ref/springref are angles; ball range is an angle too
        let to_rad = |v: f64, angular: bool| {
            if angular && self.compiler.angle == AngleUnit::Degree {
                v.to_radians()
            } else {
                v
            }
        };
        let hinge = jnt_type == MjJointType::Hinge;
        let range = joint
            .range
            .map(|(lo, hi)| {
                let angular = matches!(jnt_type, MjJointType::Hinge | MjJointType::Ball);
                (to_rad(lo, angular), to_rad(hi, angular))
            })
            .unwrap_or((-std::f64::consts::PI, std::f64::consts::PI));
        let spring_ref = to_rad(joint.spring_ref.unwrap_or(0.0), hinge);
        let ref_pos = to_rad(joint.ref_pos.unwrap_or(0.0), hinge);

        let m = &mut self.model;
        m.jnt_type.push(jnt_type);
        m.jnt_body.push(body_id);
        m.jnt_qpos_adr.push(qpos_adr);
        m.jnt_dof_adr.push(dof_adr);
        m.jnt_pos.push(world_quat * joint.pos.unwrap_or_else(Vector3::zeros));
        m.jnt_axis.push(world_quat * axis);
        m.jnt_limited.push(limited);
        m.jnt_range.push(range);
        m.jnt_stiffness.push(joint.stiffness.unwrap_or(0.0));
        m.jnt_springref.push(spring_ref);
        m.jnt_damping.push(joint.damping.unwrap_or(0.0));
        m.jnt_armature.push(joint.armature.unwrap_or(0.0));
        m.jnt_name.push(if joint.name.is_empty() {
            None
        } else {
            Some(joint.name.clone())
        });
        m.dof_jnt.extend(std::iter::repeat_n(jnt_id, jnt_type.nv()));
        m.nq += jnt_type.nq();
        m.nv += jnt_type.nv();

        match jnt_type {
            MjJointType::Hinge | MjJointType::Slide => self.qpos0_values.push(ref_pos),
            MjJointType::Ball => self.qpos0_values.extend_from_slice(&[1.0, 0.0, 0.0, 0.0]),
            MjJointType::Free => {
                let q = world_quat.into_inner();
                self.qpos0_values.extend_from_slice(&[
                    world_pos.x,
                    world_pos.y,
                    world_pos.z,
                    q.w,
                    q.i,
                    q.j,
                    q.k,
                ]);
            }
        }

        Ok(jnt_id)
    }
}
