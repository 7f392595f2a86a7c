//! MJCF (MuJoCo XML Format) model loader for physics simulation.
//!
//! This crate parses a subset of [MJCF](https://mujoco.readthedocs.io/en/stable/XMLreference.html)
//! and converts it into a `sim-core` [`Model`](sim_core::Model).
//!
//! # Example
//!
//! ```
//! use sim_mjcf::load_model;
//!
//! let mjcf = r#"
//!     <mujoco model="simple">
//!         <worldbody>
//!             <body name="base">
//!                 <joint name="slider" type="slide" axis="0 0 1"/>
//!                 <geom type="sphere" size="0.1" mass="1.0"/>
//!             </body>
//!         </worldbody>
//!     </mujoco>
//! "#;
//!
//! let model = load_model(mjcf).expect("should parse");
//! assert_eq!(model.name, "simple");
//!
//! let mut data = model.make_data();
//! for _ in 0..100 {
//!     data.step(&model).expect("step failed");
//! }
//! ```
//!
//! # Supported MJCF Elements
//!
//! - `<mujoco model="...">` - Root element, model name
//! - `<option timestep gravity>` - Global simulation options
//! - `<compiler angle autolimits>` - Angle unit and limit inference
//! - `<worldbody>`, `<body name pos quat>` - Body tree
//! - `<inertial pos mass diaginertia>` - Explicit mass properties
//! - `<geom type size pos fromto mass density>` - Mass from primitive shapes
//! - `<joint>` with `type="hinge|slide|ball|free"`, `axis`, `pos`, `range`,
//!   `limited`, `ref`, `springref`, `stiffness`, `damping`, `armature`
//! - `<freejoint>` - Shorthand for a free joint
//! - `<actuator><motor name joint gear/></actuator>` - Direct force actuators
//!
//! Everything else is skipped. Sections that could change dynamics
//! (`<default>`, `<equality>`, `<tendon>`, ...) are skipped with a warning.
//!
//! # Limitations
//!
//! - Default classes and `<include>` are not supported
//! - Body orientation only via `quat`
//! - Cylindrical and planar joints are rejected

#![doc(html_root_url = "https://docs.rs/sim-mjcf/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::should_implement_trait,
    clippy::doc_markdown,
    clippy::suboptimal_flops,
    clippy::similar_names,
    clippy::many_single_char_names
)]

mod builder;
mod error;
mod parser;
mod types;
mod validation;

pub use builder::mass::{MassProps, body_mass_props};
pub use builder::{load_model, load_model_from_file, model_from_mjcf};
pub use error::{MjcfError, Result};
pub use parser::parse_mjcf_str;
pub use types::{
    AngleUnit, MjcfActuator, MjcfBody, MjcfCompiler, MjcfGeom, MjcfGeomType, MjcfInertial,
    MjcfJoint, MjcfJointType, MjcfModel, MjcfOption,
};
pub use validation::{validate, validate_option};
