//! Model struct definition and field accessors.
//!
//! [`Model`] is the static, immutable description of the simulated system:
//! kinematic tree, joint definitions, actuators, and options. It is
//! constructed by sim-mjcf's model builder and shared (read-only) with the
//! stepping thread and the initial-state applier.

use nalgebra::{DVector, Vector3};
use std::collections::HashMap;

use super::enums::{ElementType, MjJointType};

/// Static model definition (like mjModel).
///
/// Immutable after construction - all memory allocated upfront.
///
/// # Memory Layout
///
/// Arrays are indexed by their respective IDs:
/// - `body_*` arrays indexed by `body_id` (0 = world)
/// - `jnt_*` arrays indexed by `joint_id`
/// - `dof_*` arrays indexed by `dof_id` (velocity dimension index)
/// - `actuator_*` arrays indexed by `actuator_id`
#[derive(Debug, Clone)]
pub struct Model {
    // ==================== Metadata ====================
    /// Model name (from MJCF model attribute).
    pub name: String,

    // ==================== Dimensions ====================
    /// Number of generalized position coordinates (includes quaternions).
    pub nq: usize,
    /// Number of generalized velocity coordinates (DOFs, always <= nq).
    pub nv: usize,
    /// Number of bodies (including world body 0).
    pub nbody: usize,
    /// Number of joints.
    pub njnt: usize,
    /// Number of actuators.
    pub nu: usize,

    // ==================== Bodies (indexed by body_id) ====================
    /// Parent body index (world is its own parent).
    pub body_parent: Vec<usize>,
    /// First joint index for this body in jnt_* arrays.
    pub body_jnt_adr: Vec<usize>,
    /// Number of joints attached to this body.
    pub body_jnt_num: Vec<usize>,
    /// Body position relative to parent frame.
    pub body_pos: Vec<Vector3<f64>>,
    /// Center of mass in body frame.
    pub body_ipos: Vec<Vector3<f64>>,
    /// Body mass (kg).
    pub body_mass: Vec<f64>,
    /// Diagonal inertia about the center of mass, body frame.
    pub body_inertia: Vec<Vector3<f64>>,
    /// Body names (`None` for anonymous bodies).
    pub body_name: Vec<Option<String>>,

    // ==================== Joints (indexed by jnt_id) ====================
    /// Joint type.
    pub jnt_type: Vec<MjJointType>,
    /// Body this joint moves.
    pub jnt_body: Vec<usize>,
    /// Start address in qpos.
    pub jnt_qpos_adr: Vec<usize>,
    /// Start address in qvel (first DOF).
    pub jnt_dof_adr: Vec<usize>,
    /// Joint anchor in body frame.
    pub jnt_pos: Vec<Vector3<f64>>,
    /// Joint axis in body frame (unit length; unused for ball/free).
    pub jnt_axis: Vec<Vector3<f64>>,
    /// Whether the joint range is enforced.
    pub jnt_limited: Vec<bool>,
    /// Joint range `(lower, upper)` for hinge/slide.
    pub jnt_range: Vec<(f64, f64)>,
    /// Spring stiffness (hinge/slide).
    pub jnt_stiffness: Vec<f64>,
    /// Spring equilibrium position.
    /// Distinct from `qpos0` which is the initial position at model load.
    pub jnt_springref: Vec<f64>,
    /// Viscous damping coefficient.
    pub jnt_damping: Vec<f64>,
    /// Armature inertia added to the joint's DOFs.
    pub jnt_armature: Vec<f64>,
    /// Joint names (`None` for anonymous joints).
    pub jnt_name: Vec<Option<String>>,

    // ==================== DOFs (indexed by dof_id) ====================
    /// Joint owning each DOF.
    pub dof_jnt: Vec<usize>,

    // ==================== Actuators (indexed by actuator_id) ====================
    /// Joint driven by each actuator.
    pub actuator_trnid: Vec<usize>,
    /// Transmission gear: force = gear * ctrl.
    pub actuator_gear: Vec<f64>,
    /// Actuator names (`None` for anonymous actuators).
    pub actuator_name: Vec<Option<String>>,

    // ==================== Options ====================
    /// Simulation timestep in seconds.
    pub timestep: f64,
    /// Gravity vector (world frame).
    pub gravity: Vector3<f64>,

    // ==================== Defaults ====================
    /// Initial joint positions (length `nq`).
    pub qpos0: DVector<f64>,

    // ==================== Name Lookup ====================
    /// Body name → index. Populated from `body_name` entries.
    pub body_name_to_id: HashMap<String, usize>,
    /// Joint name → index. Populated from `jnt_name` entries.
    pub jnt_name_to_id: HashMap<String, usize>,
    /// Actuator name → index. Populated from `actuator_name` entries.
    pub actuator_name_to_id: HashMap<String, usize>,
}

impl Model {
    /// Get reference position for specified joint (from qpos0).
    ///
    /// Returns `None` if `jnt_id` is out of bounds.
    #[must_use]
    pub fn joint_qpos0(&self, jnt_id: usize) -> Option<&[f64]> {
        if jnt_id >= self.njnt {
            return None;
        }
        let start = self.jnt_qpos_adr[jnt_id];
        let len = self.jnt_type[jnt_id].nq();
        Some(&self.qpos0.as_slice()[start..start + len])
    }

    /// Look up an element index by name.
    ///
    /// Exact string match against the tables built at load time.
    ///
    /// ```ignore
    /// let joint_id = model.name2id(ElementType::Joint, "shoulder").unwrap();
    /// ```
    #[must_use]
    pub fn name2id(&self, element: ElementType, name: &str) -> Option<usize> {
        match element {
            ElementType::Body => self.body_name_to_id.get(name).copied(),
            ElementType::Joint => self.jnt_name_to_id.get(name).copied(),
            ElementType::Actuator => self.actuator_name_to_id.get(name).copied(),
        }
    }

    /// Look up an element name by index.
    #[must_use]
    pub fn id2name(&self, element: ElementType, id: usize) -> Option<&str> {
        match element {
            ElementType::Body => self.body_name.get(id).and_then(|n| n.as_deref()),
            ElementType::Joint => self.jnt_name.get(id).and_then(|n| n.as_deref()),
            ElementType::Actuator => self.actuator_name.get(id).and_then(|n| n.as_deref()),
        }
    }

    /// Rebuild the name → index maps from the `*_name` arrays.
    ///
    /// Called once by model constructors after all elements are added.
    pub fn rebuild_name_maps(&mut self) {
        fn index(names: &[Option<String>]) -> HashMap<String, usize> {
            names
                .iter()
                .enumerate()
                .filter_map(|(i, n)| n.as_ref().map(|n| (n.clone(), i)))
                .collect()
        }
        self.body_name_to_id = index(&self.body_name);
        self.jnt_name_to_id = index(&self.jnt_name);
        self.actuator_name_to_id = index(&self.actuator_name);
    }
}
