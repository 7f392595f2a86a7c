//! Joint name → index and state-array offset resolution.
//!
//! Lookup is an exact string match against [`Model::jnt_name_to_id`], which
//! the model builder fills once at load time. A missing name resolves to
//! `None`; callers decide whether that is fatal.

use crate::types::{MjJointType, Model};

/// Resolved addressing for one joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointAddress {
    /// Joint index in `jnt_*` arrays.
    pub id: usize,
    /// Joint type.
    pub jnt_type: MjJointType,
    /// Base offset into `qpos`.
    pub qpos_adr: usize,
    /// Base offset into `qvel`.
    pub dof_adr: usize,
    /// Number of `qpos` slots the joint occupies.
    pub nq: usize,
    /// Number of `qvel` slots the joint occupies.
    pub nv: usize,
}

impl JointAddress {
    /// Resolve a joint by name.
    #[must_use]
    pub fn lookup(model: &Model, name: &str) -> Option<Self> {
        resolve(model, name).map(|id| Self::of(model, id))
    }

    fn of(model: &Model, id: usize) -> Self {
        let jnt_type = model.jnt_type[id];
        Self {
            id,
            jnt_type,
            qpos_adr: model.jnt_qpos_adr[id],
            dof_adr: model.jnt_dof_adr[id],
            nq: jnt_type.nq(),
            nv: jnt_type.nv(),
        }
    }
}

/// Joint index for `name`, or `None` if the model has no such joint.
#[must_use]
pub fn resolve(model: &Model, name: &str) -> Option<usize> {
    model.jnt_name_to_id.get(name).copied()
}

/// Full addressing for the joint called `name`.
#[must_use]
pub fn address(model: &Model, name: &str) -> Option<JointAddress> {
    JointAddress::lookup(model, name)
}

/// Base offset of joint `id` in `qpos`.
///
/// Returns `None` if `id` is out of bounds.
#[must_use]
pub fn position_offset(model: &Model, id: usize) -> Option<usize> {
    model.jnt_qpos_adr.get(id).copied()
}

/// Base offset of joint `id` in `qvel`.
///
/// Returns `None` if `id` is out of bounds.
#[must_use]
pub fn velocity_offset(model: &Model, id: usize) -> Option<usize> {
    model.jnt_dof_adr.get(id).copied()
}
