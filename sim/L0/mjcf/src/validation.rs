//! MJCF validation.
//!
//! Structural checks run on the parsed document before any `Model` arrays
//! are built, so a failed load never produces a half-populated model.

use std::collections::HashSet;

use crate::error::{MjcfError, Result};
use crate::types::{MjcfBody, MjcfModel, MjcfOption};

/// Validate MJCF simulation options.
///
/// # Errors
///
/// Returns an error if the timestep is not positive and finite, or gravity
/// has a non-finite component.
pub fn validate_option(option: &MjcfOption) -> Result<()> {
    if !option.timestep.is_finite() || option.timestep <= 0.0 {
        return Err(MjcfError::invalid_option(
            "timestep",
            format!("must be positive and finite, got {}", option.timestep),
        ));
    }
    if option.gravity.iter().any(|g| !g.is_finite()) {
        return Err(MjcfError::invalid_option(
            "gravity",
            format!("must be finite, got {:?}", option.gravity.as_slice()),
        ));
    }
    Ok(())
}

/// Validate a parsed model.
///
/// Checks options, body and joint name uniqueness, masses, and that every
/// actuator targets a joint that exists.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate(model: &MjcfModel) -> Result<()> {
    validate_option(&model.option)?;

    let mut bodies = HashSet::new();
    let mut joints = HashSet::new();
    let mut first_error = None;

    let mut check_body = |body: &MjcfBody| {
        if first_error.is_some() {
            return;
        }
        if !body.name.is_empty() && !bodies.insert(body.name.clone()) {
            first_error = Some(MjcfError::DuplicateBody(body.name.clone()));
            return;
        }

        if let Some(inertial) = &body.inertial {
            if !inertial.mass.is_finite() || inertial.mass < 0.0 {
                first_error = Some(MjcfError::invalid_mass(&body.name, inertial.mass));
                return;
            }
        }
        for joint in body.joints.iter().filter(|j| !j.name.is_empty()) {
            if !joints.insert(joint.name.clone()) {
                first_error = Some(MjcfError::DuplicateJoint(joint.name.clone()));
                return;
            }
        }
    };
    for child in &model.worldbody.children {
        child.walk(&mut check_body);
    }
    if let Some(err) = first_error {
        return Err(err);
    }

    let mut actuators = HashSet::new();
    for actuator in &model.actuators {
        if !actuator.name.is_empty() && !actuators.insert(actuator.name.as_str()) {
            return Err(MjcfError::DuplicateActuator(actuator.name.clone()));
        }
        let context = format!("actuator '{}'", actuator.name);
        match &actuator.joint {
            Some(joint) if joints.contains(joint) => {}
            Some(joint) => return Err(MjcfError::undefined_joint(joint, context)),
            None => {
                return Err(MjcfError::Unsupported(format!(
                    "{context} has no joint transmission"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parse_mjcf_str;

    fn check(xml: &str) -> Result<()> {
        validate(&parse_mjcf_str(xml).unwrap())
    }

    #[test]
    fn test_empty_model_is_valid() {
        assert!(validate(&MjcfModel::new("test")).is_ok());
    }

    #[test]
    fn test_nested_tree_is_valid() {
        check(
            r#"<mujoco><worldbody>
                <body name="a"><joint name="ja"/>
                    <body name="b"><joint name="jb"/></body>
                </body>
                <body name="c"/>
            </worldbody>
            <actuator><motor name="m" joint="jb"/></actuator></mujoco>"#,
        )
        .unwrap();
    }

    #[test]
    fn test_duplicate_actuator() {
        let err = check(
            r#"<mujoco>
                <worldbody><body name="a"><joint name="j"/></body></worldbody>
                <actuator><motor name="m" joint="j"/><motor name="m" joint="j"/></actuator>
            </mujoco>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MjcfError::DuplicateActuator(n) if n == "m"));
    }

    #[test]
    fn test_duplicate_joint() {
        let err = check(
            r#"<mujoco><worldbody>
                <body name="a"><joint name="j"/></body>
                <body name="b"><joint name="j"/></body>
            </worldbody></mujoco>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MjcfError::DuplicateJoint(n) if n == "j"));
    }

    #[test]
    fn test_anonymous_bodies_are_not_duplicates() {
        check(
            r#"<mujoco><worldbody><body><joint/></body><body><joint/></body></worldbody></mujoco>"#,
        )
        .unwrap();
    }

    #[test]
    fn test_duplicate_body() {
        let err = check(
            r#"<mujoco><worldbody>
                <body name="a"><body name="a"/></body>
            </worldbody></mujoco>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MjcfError::DuplicateBody(n) if n == "a"));
    }

    #[test]
    fn test_actuator_on_undefined_joint() {
        let err = check(
            r#"<mujoco>
                <worldbody><body name="a"><joint name="j"/></body></worldbody>
                <actuator><motor name="m" joint="nope"/></actuator>
            </mujoco>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MjcfError::UndefinedJoint { ref joint_name, .. } if joint_name == "nope"));
    }

    #[test]
    fn test_bad_timestep() {
        let err = check(r#"<mujoco><option timestep="0"/></mujoco>"#).unwrap_err();
        assert!(matches!(err, MjcfError::InvalidOption { ref option, .. } if option == "timestep"));

        let err = check(r#"<mujoco><option timestep="-0.01"/></mujoco>"#).unwrap_err();
        assert!(matches!(err, MjcfError::InvalidOption { .. }));
    }

    #[test]
    fn test_negative_mass() {
        let err = check(
            r#"<mujoco><worldbody>
                <body name="a"><inertial pos="0 0 0" mass="-1"/></body>
            </worldbody></mujoco>"#,
        )
        .unwrap_err();
        assert!(matches!(err, MjcfError::InvalidMass { .. }));
    }
}
