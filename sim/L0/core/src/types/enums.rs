//! Enums and error types shared by Model and Data.

/// Element type for name↔index lookup via [`Model::name2id`] / [`Model::id2name`].
///
/// Each variant corresponds to a named element category in the model.
///
/// [`Model::name2id`]: super::Model::name2id
/// [`Model::id2name`]: super::Model::id2name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Body elements (indexed by body_id).
    Body,
    /// Joint elements (indexed by jnt_id).
    Joint,
    /// Actuator elements (indexed by actuator_id).
    Actuator,
}

/// Joint type following `MuJoCo` conventions.
///
/// `MuJoCo` uses different names than most robotics stacks (Hinge vs Revolute,
/// Slide vs Prismatic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MjJointType {
    /// Hinge joint (1 DOF): rotation about a single axis.
    /// qpos: 1 scalar (angle in radians)
    /// qvel: 1 scalar (angular velocity)
    #[default]
    Hinge,
    /// Slide joint (1 DOF): translation along a single axis.
    /// qpos: 1 scalar (displacement)
    /// qvel: 1 scalar (linear velocity)
    Slide,
    /// Ball joint (3 DOF): free rotation (spherical).
    /// qpos: 4 scalars (unit quaternion w, x, y, z)
    /// qvel: 3 scalars (angular velocity, local frame)
    Ball,
    /// Free joint (6 DOF): floating body with no constraints.
    /// qpos: 7 scalars (position x,y,z + quaternion w,x,y,z)
    /// qvel: 6 scalars (linear velocity + angular velocity)
    Free,
}

impl MjJointType {
    /// Number of position coordinates (nq contribution).
    #[must_use]
    pub const fn nq(self) -> usize {
        match self {
            Self::Hinge | Self::Slide => 1,
            Self::Ball => 4, // quaternion
            Self::Free => 7, // pos + quat
        }
    }

    /// Number of velocity coordinates / DOFs (nv contribution).
    #[must_use]
    pub const fn nv(self) -> usize {
        match self {
            Self::Hinge | Self::Slide => 1,
            Self::Ball => 3, // angular velocity
            Self::Free => 6, // linear + angular velocity
        }
    }

    /// Whether this joint type uses quaternion representation.
    #[must_use]
    pub const fn uses_quaternion(self) -> bool {
        matches!(self, Self::Ball | Self::Free)
    }

    /// Whether this joint type supports springs (linear displacement from equilibrium).
    /// Ball/Free joints use quaternions and don't have a simple spring formulation.
    #[must_use]
    pub const fn supports_spring(self) -> bool {
        matches!(self, Self::Hinge | Self::Slide)
    }
}

/// Errors that can occur during a simulation step.
///
/// Following Rust idioms, step() returns Result<(), StepError> instead of
/// silently correcting issues. Users must handle failures explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepError {
    /// Timestep is zero, negative, or not finite.
    InvalidTimestep,
    /// A position or velocity coordinate became NaN or infinite.
    Diverged {
        /// Step counter at which divergence was detected.
        nstep: u64,
        /// First offending DOF (velocity index) or qpos index.
        index: usize,
    },
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimestep => write!(f, "timestep is zero, negative, or not finite"),
            Self::Diverged { nstep, index } => {
                write!(f, "state diverged at step {nstep} (coordinate {index})")
            }
        }
    }
}

impl std::error::Error for StepError {}
