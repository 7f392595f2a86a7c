//! Hand-built models for tests and examples that skip MJCF.

use nalgebra::{DVector, Vector3};
use std::f64::consts::PI;

use super::enums::MjJointType;
use super::model::Model;

impl Model {
    /// Serial chain of `n` hinge links swinging about Y.
    ///
    /// Link `i` is body `i + 1`, with its mass at the body origin and its
    /// hinge `link_length` above. Joints are `hinge_0 .. hinge_{n-1}`, all
    /// at zero (hanging straight down).
    ///
    /// # Panics
    /// Panics if `n` is 0 (requires at least 1 link).
    #[must_use]
    pub fn n_link_pendulum(n: usize, link_length: f64, link_mass: f64) -> Self {
        assert!(n >= 1, "n_link_pendulum requires at least 1 link");

        let mut model = Self::empty();
        model.name = format!("pendulum_{n}");

        model.nq = n;
        model.nv = n;
        model.nbody = n + 1;
        model.njnt = n;

        for i in 0..n {
            let body_id = i + 1;

            model.body_parent.push(i);
            model.body_jnt_adr.push(i);
            model.body_jnt_num.push(1);
            model.body_pos.push(Vector3::new(0.0, 0.0, -link_length));
            model.body_ipos.push(Vector3::zeros());
            model.body_mass.push(link_mass);
            model.body_inertia.push(Vector3::new(0.001, 0.001, 0.001));
            model.body_name.push(Some(format!("link_{i}")));

            model.jnt_type.push(MjJointType::Hinge);
            model.jnt_body.push(body_id);
            model.jnt_qpos_adr.push(i);
            model.jnt_dof_adr.push(i);
            model.jnt_pos.push(Vector3::new(0.0, 0.0, link_length));
            model.jnt_axis.push(Vector3::y());
            model.jnt_limited.push(false);
            model.jnt_range.push((-PI, PI));
            model.jnt_stiffness.push(0.0);
            model.jnt_springref.push(0.0);
            model.jnt_damping.push(0.0);
            model.jnt_armature.push(0.0);
            model.jnt_name.push(Some(format!("hinge_{i}")));

            model.dof_jnt.push(i);
        }

        model.qpos0 = DVector::zeros(n);
        model.rebuild_name_maps();
        model
    }
}
