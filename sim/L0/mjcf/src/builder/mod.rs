//! MJCF-to-Model builder.
//!
//! Converts a parsed [`MjcfModel`] into a physics-ready [`Model`]. Body
//! frames are resolved to world-aligned frames at `qpos0`, so joint axes,
//! anchors, and centers of mass are stored in world orientation.

mod actuator;
mod body;
mod joint;
pub mod mass;

use nalgebra::{DVector, UnitQuaternion, Vector3};
use sim_core::Model;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{MjcfError, Result};
use crate::types::{MjcfCompiler, MjcfModel};
use crate::validation::validate;

/// Convert a parsed MJCF document into a [`Model`].
///
/// The document is validated first; nothing is built from an invalid one.
///
/// # Errors
///
/// Returns an error if validation fails or the document uses a joint type
/// or actuator target the builder cannot represent.
pub fn model_from_mjcf(mjcf: &MjcfModel) -> Result<Model> {
    validate(mjcf)?;

    let mut builder = ModelBuilder::new(mjcf);
    if !mjcf.worldbody.geoms.is_empty() {
        debug!(count = mjcf.worldbody.geoms.len(), "static world geoms carry no mass");
    }
    for body in &mjcf.worldbody.children {
        builder.process_body(body, 0)?;
    }
    builder.process_actuators(&mjcf.actuators)?;

    let model = builder.finish();
    info!(
        model = %model.name,
        nbody = model.nbody,
        njnt = model.njnt,
        nq = model.nq,
        nv = model.nv,
        nu = model.nu,
        "built model"
    );
    Ok(model)
}

/// Load a [`Model`] from an MJCF string.
///
/// # Example
///
/// ```
/// let model = sim_mjcf::load_model(r#"
///     <mujoco model="pendulum">
///         <worldbody>
///             <body name="bob" pos="0 0 -1">
///                 <joint name="swing" type="hinge" axis="0 1 0" pos="0 0 1"/>
///                 <geom type="sphere" size="0.05" mass="1"/>
///             </body>
///         </worldbody>
///     </mujoco>
/// "#).expect("valid model");
///
/// assert_eq!(model.njnt, 1);
/// ```
///
/// # Errors
///
/// Returns an error if parsing, validation, or conversion fails.
pub fn load_model(xml: &str) -> Result<Model> {
    let mjcf = crate::parse_mjcf_str(xml)?;
    model_from_mjcf(&mjcf)
}

/// Load a [`Model`] from an MJCF file path.
///
/// # Errors
///
/// Returns [`MjcfError::Io`] if the file cannot be read, otherwise the same
/// errors as [`load_model`].
pub fn load_model_from_file<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|e| MjcfError::io(path, e))?;
    debug!(path = %path.display(), bytes = xml.len(), "read MJCF file");
    load_model(&xml)
}

/// Incremental [`Model`] construction state.
pub(crate) struct ModelBuilder {
    pub(crate) compiler: MjcfCompiler,
    pub(crate) model: Model,
    pub(crate) qpos0_values: Vec<f64>,
    pub(crate) joint_name_to_id: HashMap<String, usize>,
    // Per body id, world frame at qpos0
    pub(crate) body_world_pos: Vec<Vector3<f64>>,
    pub(crate) body_world_quat: Vec<UnitQuaternion<f64>>,
}

impl ModelBuilder {
    fn new(mjcf: &MjcfModel) -> Self {
        let mut model = Model::empty();
        model.name.clone_from(&mjcf.name);
        model.timestep = mjcf.option.timestep;
        model.gravity = mjcf.option.gravity;

        Self {
            compiler: mjcf.compiler.clone(),
            model,
            qpos0_values: Vec::new(),
            joint_name_to_id: HashMap::new(),
            body_world_pos: vec![Vector3::zeros()],
            body_world_quat: vec![UnitQuaternion::identity()],
        }
    }

    fn finish(self) -> Model {
        let mut model = self.model;
        model.nbody = model.body_parent.len();
        model.njnt = model.jnt_type.len();
        model.nu = model.actuator_trnid.len();
        model.qpos0 = DVector::from_vec(self.qpos0_values);
        model.rebuild_name_maps();
        model
    }
}
