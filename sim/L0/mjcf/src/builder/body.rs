//! Body tree traversal.
//!
//! Processes MJCF `<body>` elements into `Model` body arrays, recursively
//! traversing the kinematic tree in document order.

use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector4};
use tracing::warn;

use super::ModelBuilder;
use super::mass::body_mass_props;
use crate::error::Result;
use crate::types::MjcfBody;

impl ModelBuilder {
    /// Process a body and its descendants.
    ///
    /// Returns the body index in the Model.
    pub(crate) fn process_body(&mut self, body: &MjcfBody, parent_id: usize) -> Result<usize> {
        let body_id = self.model.body_parent.len();

        let parent_pos = self.body_world_pos[parent_id];
        let parent_quat = self.body_world_quat[parent_id];
        let offset = parent_quat * body.pos;
        let world_pos = parent_pos + offset;
        let world_quat = parent_quat * quat_from_wxyz(body.quat, &body.name);
        self.body_world_pos.push(world_pos);
        self.body_world_quat.push(world_quat);

        let props = body_mass_props(body.inertial.as_ref(), &body.geoms);
        let rot = world_quat.to_rotation_matrix();
        let inertia = (rot.matrix() * Matrix3::from_diagonal(&props.inertia) * rot.matrix().transpose())
            .diagonal();

        self.model.body_parent.push(parent_id);
        self.model.body_jnt_adr.push(self.model.jnt_type.len());
        self.model.body_pos.push(offset);
        self.model.body_ipos.push(world_quat * props.com);
        self.model.body_mass.push(props.mass);
        self.model.body_inertia.push(inertia);
        self.model.body_name.push(if body.name.is_empty() {
            None
        } else {
            Some(body.name.clone())
        });

        for joint in &body.joints {
            self.process_joint(joint, body_id, world_pos, world_quat)?;
        }
        self.model.body_jnt_num.push(body.joints.len());

        for child in &body.children {
            self.process_body(child, body_id)?;
        }

        Ok(body_id)
    }
}

/// MJCF `[w, x, y, z]` to a unit quaternion; a zero quaternion becomes identity.
fn quat_from_wxyz(q: Vector4<f64>, body_name: &str) -> UnitQuaternion<f64> {
    UnitQuaternion::try_new(Quaternion::new(q[0], q[1], q[2], q[3]), 1e-10).unwrap_or_else(|| {
        warn!(body = %body_name, "zero quaternion, using identity");
        UnitQuaternion::identity()
    })
}
