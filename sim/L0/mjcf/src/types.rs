//! MJCF intermediate representation.
//!
//! The parser fills these types straight from XML attributes; the builder
//! turns them into a [`sim_core::Model`]. `None` means "attribute absent"
//! wherever MuJoCo has a default that depends on context.

use nalgebra::{Vector3, Vector4};

/// Angle unit declared by `<compiler angle="...">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    /// Degrees (MuJoCo default).
    #[default]
    Degree,
    /// Radians.
    Radian,
}

/// `<compiler>` settings that affect model construction.
#[derive(Debug, Clone, PartialEq)]
pub struct MjcfCompiler {
    /// Unit of angle-valued joint attributes (`range`, `ref`, `springref`).
    pub angle: AngleUnit,
    /// Infer `limited` from the presence of `range`.
    pub autolimits: bool,
}

impl Default for MjcfCompiler {
    fn default() -> Self {
        Self {
            angle: AngleUnit::Degree,
            autolimits: true,
        }
    }
}

/// `<option>` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MjcfOption {
    /// Integration timestep in seconds.
    pub timestep: f64,
    /// Gravity vector.
    pub gravity: Vector3<f64>,
}

impl Default for MjcfOption {
    fn default() -> Self {
        Self {
            timestep: 0.002,
            gravity: Vector3::new(0.0, 0.0, -9.81),
        }
    }
}

/// Joint type as written in MJCF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MjcfJointType {
    /// Revolute joint.
    #[default]
    Hinge,
    /// Prismatic joint.
    Slide,
    /// Spherical joint.
    Ball,
    /// Floating base.
    Free,
    /// Rotation plus translation along one axis (not supported by the builder).
    Cylindrical,
    /// Planar motion (not supported by the builder).
    Planar,
}

impl MjcfJointType {
    /// Parse joint type from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hinge" => Some(Self::Hinge),
            "slide" => Some(Self::Slide),
            "ball" => Some(Self::Ball),
            "free" => Some(Self::Free),
            "cylindrical" => Some(Self::Cylindrical),
            "planar" => Some(Self::Planar),
            _ => None,
        }
    }
}

/// `<joint>` or `<freejoint>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MjcfJoint {
    /// Joint name. Empty names are filled in by the parser.
    pub name: String,
    /// Name of the owning body.
    pub body: Option<String>,
    /// Joint type.
    pub joint_type: Option<MjcfJointType>,
    /// Anchor position in the body frame.
    pub pos: Option<Vector3<f64>>,
    /// Joint axis in the body frame.
    pub axis: Option<Vector3<f64>>,
    /// Explicit `limited` flag.
    pub limited: Option<bool>,
    /// Position range (angle unit per compiler for hinges).
    pub range: Option<(f64, f64)>,
    /// Reference position (`ref`), becomes `qpos0` for hinge and slide.
    pub ref_pos: Option<f64>,
    /// Spring rest position.
    pub spring_ref: Option<f64>,
    /// Spring stiffness.
    pub stiffness: Option<f64>,
    /// Viscous damping.
    pub damping: Option<f64>,
    /// Rotor inertia added to the joint-space mass.
    pub armature: Option<f64>,
}

/// `<geom>` primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MjcfGeomType {
    /// Sphere, `size = r`.
    #[default]
    Sphere,
    /// Box, `size = hx hy hz`.
    Box,
    /// Capsule, `size = r hl`.
    Capsule,
    /// Cylinder, `size = r hl`.
    Cylinder,
    /// Ellipsoid, `size = rx ry rz`.
    Ellipsoid,
    /// Infinite plane; massless.
    Plane,
}

impl MjcfGeomType {
    /// Parse geom type from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sphere" => Some(Self::Sphere),
            "box" => Some(Self::Box),
            "capsule" => Some(Self::Capsule),
            "cylinder" => Some(Self::Cylinder),
            "ellipsoid" => Some(Self::Ellipsoid),
            "plane" => Some(Self::Plane),
            _ => None,
        }
    }
}

/// `<geom>` element. Only the attributes that determine mass are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MjcfGeom {
    /// Optional geom name.
    pub name: Option<String>,
    /// Primitive type.
    pub geom_type: Option<MjcfGeomType>,
    /// Position in the body frame.
    pub pos: Option<Vector3<f64>>,
    /// Size parameters (meaning depends on type).
    pub size: Vec<f64>,
    /// Segment endpoints for capsules and cylinders.
    pub fromto: Option<[f64; 6]>,
    /// Explicit mass; overrides density.
    pub mass: Option<f64>,
    /// Density in kg/m³.
    pub density: Option<f64>,
}

/// `<inertial>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct MjcfInertial {
    /// Center of mass in the body frame.
    pub pos: Vector3<f64>,
    /// Mass.
    pub mass: f64,
    /// Principal moments of inertia.
    pub diaginertia: Option<Vector3<f64>>,
}

impl Default for MjcfInertial {
    fn default() -> Self {
        Self {
            pos: Vector3::zeros(),
            mass: 0.0,
            diaginertia: None,
        }
    }
}

/// `<body>` element (also used for `<worldbody>`).
#[derive(Debug, Clone, PartialEq)]
pub struct MjcfBody {
    /// Body name.
    pub name: String,
    /// Position relative to the parent frame.
    pub pos: Vector3<f64>,
    /// Orientation relative to the parent frame, `[w, x, y, z]`.
    pub quat: Vector4<f64>,
    /// Explicit inertial properties.
    pub inertial: Option<MjcfInertial>,
    /// Joints, in document order.
    pub joints: Vec<MjcfJoint>,
    /// Geoms, in document order.
    pub geoms: Vec<MjcfGeom>,
    /// Child bodies.
    pub children: Vec<MjcfBody>,
}

impl MjcfBody {
    /// Create an empty body at the parent origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pos: Vector3::zeros(),
            quat: Vector4::new(1.0, 0.0, 0.0, 0.0),
            inertial: None,
            joints: Vec::new(),
            geoms: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Visit this body and all descendants depth-first, parents first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a MjcfBody)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

/// `<motor>` actuator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MjcfActuator {
    /// Actuator name.
    pub name: String,
    /// Target joint.
    pub joint: Option<String>,
    /// Scalar gear ratio (first component of MJCF `gear`).
    pub gear: Option<f64>,
}

/// Parsed MJCF document.
#[derive(Debug, Clone, PartialEq)]
pub struct MjcfModel {
    /// Model name.
    pub name: String,
    /// Global simulation options.
    pub option: MjcfOption,
    /// Compiler settings.
    pub compiler: MjcfCompiler,
    /// Root worldbody containing the body tree.
    pub worldbody: MjcfBody,
    /// Actuators.
    pub actuators: Vec<MjcfActuator>,
}

impl MjcfModel {
    /// Create an empty model with default options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            option: MjcfOption::default(),
            compiler: MjcfCompiler::default(),
            worldbody: MjcfBody::new("world"),
            actuators: Vec::new(),
        }
    }
}

impl Default for MjcfModel {
    fn default() -> Self {
        Self::new("unnamed")
    }
}
