//! Actuator processing.
//!
//! `<motor>` actuators map one control input onto one hinge or slide joint
//! with a scalar gear.

use sim_core::MjJointType;

use super::ModelBuilder;
use crate::error::{MjcfError, Result};
use crate::types::MjcfActuator;

impl ModelBuilder {
    /// Append all actuators. Joints must already be processed.
    pub(crate) fn process_actuators(&mut self, actuators: &[MjcfActuator]) -> Result<()> {
        for actuator in actuators {
            let context = format!("actuator '{}'", actuator.name);
            let joint = actuator.joint.as_deref().unwrap_or_default();
            let jnt_id = *self
                .joint_name_to_id
                .get(joint)
                .ok_or_else(|| MjcfError::undefined_joint(joint, &context))?;

            if !matches!(self.model.jnt_type[jnt_id], MjJointType::Hinge | MjJointType::Slide) {
                return Err(MjcfError::Unsupported(format!(
                    "{context}: motor on multi-DOF joint '{joint}'"
                )));
            }

            self.model.actuator_trnid.push(jnt_id);
            self.model.actuator_gear.push(actuator.gear.unwrap_or(1.0));
            self.model.actuator_name.push(if actuator.name.is_empty() {
                None
            } else {
                Some(actuator.name.clone())
            });
        }
        Ok(())
    }
}
