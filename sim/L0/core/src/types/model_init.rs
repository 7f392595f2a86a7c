//! Model construction helpers: empty model and Data allocation.

use nalgebra::{DVector, Vector3};
use std::collections::HashMap;

use super::data::Data;
use super::model::Model;

/// MuJoCo's default timestep (seconds).
pub(crate) const DEFAULT_TIMESTEP: f64 = 0.002;

impl Model {
    /// Create an empty model containing only the world body.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            nq: 0,
            nv: 0,
            nbody: 1,
            njnt: 0,
            nu: 0,

            // World body
            body_parent: vec![0],
            body_jnt_adr: vec![0],
            body_jnt_num: vec![0],
            body_pos: vec![Vector3::zeros()],
            body_ipos: vec![Vector3::zeros()],
            body_mass: vec![0.0],
            body_inertia: vec![Vector3::zeros()],
            body_name: vec![Some("world".to_string())],

            jnt_type: Vec::new(),
            jnt_body: Vec::new(),
            jnt_qpos_adr: Vec::new(),
            jnt_dof_adr: Vec::new(),
            jnt_pos: Vec::new(),
            jnt_axis: Vec::new(),
            jnt_limited: Vec::new(),
            jnt_range: Vec::new(),
            jnt_stiffness: Vec::new(),
            jnt_springref: Vec::new(),
            jnt_damping: Vec::new(),
            jnt_armature: Vec::new(),
            jnt_name: Vec::new(),

            dof_jnt: Vec::new(),

            actuator_trnid: Vec::new(),
            actuator_gear: Vec::new(),
            actuator_name: Vec::new(),

            timestep: DEFAULT_TIMESTEP,
            gravity: Vector3::new(0.0, 0.0, -9.81),

            qpos0: DVector::zeros(0),

            body_name_to_id: HashMap::from([("world".to_string(), 0)]),
            jnt_name_to_id: HashMap::new(),
            actuator_name_to_id: HashMap::new(),
        }
    }

    /// Allocate simulation state for this model.
    ///
    /// `qpos = qpos0`, everything else zero.
    #[must_use]
    pub fn make_data(&self) -> Data {
        Data {
            qpos: self.qpos0.clone(),
            qvel: DVector::zeros(self.nv),
            qacc: DVector::zeros(self.nv),
            ctrl: DVector::zeros(self.nu),
            qfrc_actuator: DVector::zeros(self.nv),
            qfrc_applied: DVector::zeros(self.nv),
            qfrc_bias: DVector::zeros(self.nv),
            qfrc_passive: DVector::zeros(self.nv),
            qm_diag: DVector::zeros(self.nv),
            nstep: 0,
            time: 0.0,
        }
    }
}
