//! Error types for MJCF parsing and loading.

use thiserror::Error;

/// Errors that can occur during MJCF parsing and loading.
#[derive(Debug, Error)]
pub enum MjcfError {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Missing required element.
    #[error("missing required element: {element} in {context}")]
    MissingElement {
        /// The missing element name.
        element: &'static str,
        /// Where the element was expected.
        context: String,
    },

    /// Invalid attribute value.
    #[error("invalid value for {attribute} on {element}: {message}")]
    InvalidAttribute {
        /// The attribute with the invalid value.
        attribute: &'static str,
        /// The element containing the attribute.
        element: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// Unknown joint type.
    #[error("unknown joint type: {0}")]
    UnknownJointType(String),

    /// Unknown geom type.
    #[error("unknown geom type: {0}")]
    UnknownGeomType(String),

    /// Reference to undefined joint.
    #[error("reference to undefined joint: {joint_name} in {context}")]
    UndefinedJoint {
        /// The joint name that was referenced.
        joint_name: String,
        /// The context where it was referenced.
        context: String,
    },

    /// Duplicate body name.
    #[error("duplicate body name: {0}")]
    DuplicateBody(String),

    /// Duplicate joint name.
    #[error("duplicate joint name: {0}")]
    DuplicateJoint(String),

    /// Duplicate actuator name.
    #[error("duplicate actuator name: {0}")]
    DuplicateActuator(String),

    /// Negative or non-finite mass.
    #[error("invalid mass for body {body_name}: {mass}")]
    InvalidMass {
        /// The body with invalid mass.
        body_name: String,
        /// The invalid mass value.
        mass: f64,
    },

    /// File I/O error.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Unsupported feature.
    #[error("unsupported MJCF feature: {0}")]
    Unsupported(String),

    /// Invalid option value.
    #[error("invalid option '{option}': {message}")]
    InvalidOption {
        /// The option with the invalid value.
        option: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

impl MjcfError {
    /// Create a missing element error.
    pub fn missing_element(element: &'static str, context: impl Into<String>) -> Self {
        Self::MissingElement {
            element,
            context: context.into(),
        }
    }

    /// Create an invalid attribute error.
    pub fn invalid_attribute(
        attribute: &'static str,
        element: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            attribute,
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create an undefined joint error.
    pub fn undefined_joint(joint_name: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UndefinedJoint {
            joint_name: joint_name.into(),
            context: context.into(),
        }
    }

    /// Create an invalid mass error.
    pub fn invalid_mass(body_name: impl Into<String>, mass: f64) -> Self {
        Self::InvalidMass {
            body_name: body_name.into(),
            mass,
        }
    }

    /// Create an invalid option error.
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error tagged with the offending path.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type for MJCF operations.
pub type Result<T> = std::result::Result<T, MjcfError>;
