//! Joint position/velocity overrides applied at load and on reset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sim_core::{Data, Model, joint_index};

use crate::error::ConfigError;
use crate::params::ParamStore;

/// Joint name → initial position.
pub const POSITIONS_KEY: &str = "initial_joint_positions/joint_map";
/// Joint name → initial velocity.
pub const VELOCITIES_KEY: &str = "initial_joint_velocities/joint_map";

/// Name → value override maps for positions and velocities.
///
/// Each value is written to the joint's first `qpos`/`qvel` slot. Maps are
/// ordered so application order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointOverrides {
    /// Joint name → position.
    pub positions: BTreeMap<String, f64>,
    /// Joint name → velocity.
    pub velocities: BTreeMap<String, f64>,
}

impl JointOverrides {
    /// Read both maps; an absent map is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WrongType`] if a map is not an object or an
    /// entry is not a number.
    pub fn from_store(store: &dyn ParamStore) -> Result<Self, ConfigError> {
        Ok(Self {
            positions: read_joint_map(store, POSITIONS_KEY)?,
            velocities: read_joint_map(store, VELOCITIES_KEY)?,
        })
    }

    /// Whether both maps are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.velocities.is_empty()
    }
}

fn read_joint_map(store: &dyn ParamStore, key: &str) -> Result<BTreeMap<String, f64>, ConfigError> {
    let entries = match store.get(key) {
        None => return Ok(BTreeMap::new()),
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            return Err(ConfigError::wrong_type(key, "an object of joint name to number", &other));
        }
    };
    entries
        .into_iter()
        .map(|(name, v)| match v.as_f64() {
            Some(x) => Ok((name, x)),
            None => Err(ConfigError::wrong_type(format!("{key}/{name}"), "a number", &v)),
        })
        .collect()
}

/// Outcome of [`apply`]: override names that matched no joint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Position override names not found in the model.
    pub unknown_positions: Vec<String>,
    /// Velocity override names not found in the model.
    pub unknown_velocities: Vec<String>,
    /// Number of values written.
    pub applied: usize,
}

impl ApplyReport {
    /// Whether every override matched a joint.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unknown_positions.is_empty() && self.unknown_velocities.is_empty()
    }
}

/// Write `overrides` into `data`.
///
/// Unknown names are skipped and reported; the remaining entries are still
/// applied. Joints not named keep their current values.
pub fn apply(model: &Model, data: &mut Data, overrides: &JointOverrides) -> ApplyReport {
    let mut report = ApplyReport::default();

    for (name, &value) in &overrides.positions {
        match joint_index::resolve(model, name).and_then(|id| joint_index::position_offset(model, id)) {
            Some(adr) => {
                data.qpos[adr] = value;
                report.applied += 1;
            }
            None => report.unknown_positions.push(name.clone()),
        }
    }

    for (name, &value) in &overrides.velocities {
        match joint_index::resolve(model, name).and_then(|id| joint_index::velocity_offset(model, id)) {
            Some(adr) => {
                data.qvel[adr] = value;
                report.applied += 1;
            }
            None => report.unknown_velocities.push(name.clone()),
        }
    }

    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::params::MemoryParamStore;
    use serde_json::json;

    fn overrides(positions: &[(&str, f64)], velocities: &[(&str, f64)]) -> JointOverrides {
        let collect = |entries: &[(&str, f64)]| {
            entries
                .iter()
                .map(|&(name, value)| (name.to_string(), value))
                .collect()
        };
        JointOverrides {
            positions: collect(positions),
            velocities: collect(velocities),
        }
    }

    #[test]
    fn writes_at_joint_offsets() {
        let model = Model::n_link_pendulum(3, 1.0, 1.0);
        let mut data = model.make_data();

        let report = apply(
            &model,
            &mut data,
            &overrides(
                &[("hinge_0", -0.314), ("hinge_1", -1.57), ("hinge_2", -0.66)],
                &[("hinge_2", 1.05)],
            ),
        );

        assert!(report.is_clean());
        assert_eq!(report.applied, 4);
        assert_eq!(data.qpos.as_slice(), &[-0.314, -1.57, -0.66]);
        assert_eq!(data.qvel.as_slice(), &[0.0, 0.0, 1.05]);
    }

    #[test]
    fn unknown_names_skipped() {
        let model = Model::n_link_pendulum(2, 1.0, 1.0);
        let mut data = model.make_data();

        let report = apply(
            &model,
            &mut data,
            &overrides(&[("elbow", 1.0), ("hinge_1", 0.5)], &[("wrist", 2.0)]),
        );

        assert_eq!(report.unknown_positions, vec!["elbow".to_string()]);
        assert_eq!(report.unknown_velocities, vec!["wrist".to_string()]);
        assert_eq!(report.applied, 1);
        assert!(!report.is_clean());
        assert_eq!(data.qpos[1], 0.5);
        assert_eq!(data.qpos[0], 0.0);
    }

    #[test]
    fn unlisted_joints_keep_values() {
        let model = Model::n_link_pendulum(3, 1.0, 1.0);
        let mut data = model.make_data();
        data.qpos[0] = 0.25;
        data.qvel[1] = -0.5;

        apply(&model, &mut data, &overrides(&[("hinge_2", 0.1)], &[]));

        assert_eq!(data.qpos[0], 0.25);
        assert_eq!(data.qvel[1], -0.5);
        assert_eq!(data.qpos[2], 0.1);
    }

    #[test]
    fn reads_maps_from_store() {
        let store = MemoryParamStore::new();
        assert!(JointOverrides::from_store(&store).unwrap().is_empty());

        store.set(POSITIONS_KEY, json!({"joint0": -0.314, "joint1": -1.57}));
        store.set(VELOCITIES_KEY, json!({"joint2": 1}));
        let read = JointOverrides::from_store(&store).unwrap();
        assert_eq!(read, overrides(&[("joint0", -0.314), ("joint1", -1.57)], &[("joint2", 1.0)]));
    }

    #[test]
    fn ill_typed_maps_rejected() {
        let store = MemoryParamStore::new();
        store.set(POSITIONS_KEY, json!([0.1, 0.2]));
        assert!(JointOverrides::from_store(&store).is_err());

        let store = MemoryParamStore::new();
        store.set(VELOCITIES_KEY, json!({"joint0": "fast"}));
        let err = JointOverrides::from_store(&store).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WrongType { ref key, .. } if key == "initial_joint_velocities/joint_map/joint0"
        ));
    }
}
