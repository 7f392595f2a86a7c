//! Core physics simulation types.
//!
//! This crate provides the MuJoCo-aligned Model/Data architecture used by the
//! simulation runtime. It follows Todorov's design where:
//!
//! - [`Model`] is static (immutable after loading)
//! - [`Data`] is dynamic (qpos/qvel are the source of truth)
//! - One step is `forward()` then `integrate()`, advancing `time` by exactly
//!   one `timestep`
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Model                               │
//! │  Static: bodies, joint definitions, addressing tables       │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Data                               │
//! │  Dynamic: qpos, qvel, time                                  │
//! │  One step: forward() then integrate()                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//!
//! - Headless training loops
//! - Hardware control code
//! - Analysis tools
//!
//! # Quick Start
//!
//! ```
//! use sim_core::Model;
//!
//! let model = Model::n_link_pendulum(1, 1.0, 0.1);
//! let mut data = model.make_data();
//!
//! data.qpos[0] = std::f64::consts::FRAC_PI_4;
//! for _ in 0..100 {
//!     data.step(&model).expect("step failed");
//! }
//! assert_eq!(data.nstep, 100);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-core/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,       // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,           // mul_add style changes aren't always clearer
    clippy::neg_cmp_op_on_partial_ord,  // !(x > 0.0) is intentional for NaN rejection
    clippy::doc_markdown,               // Not all technical terms need backticks
)]

// Core type definitions (enums, Model, Data)
pub mod types;

// Joint visitor pattern
pub mod joint_visitor;

// Joint name → index/offset resolution
pub mod joint_index;

// Forward dynamics (passive, gravity, actuation → qacc)
pub mod forward;

// Semi-implicit Euler integration
pub mod integrate;

pub use joint_index::{JointAddress, address, position_offset, resolve, velocity_offset};
pub use joint_visitor::{JointContext, JointVisitor};

pub use types::{Data, ElementType, MjJointType, Model, StepError};

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_precision_loss
)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_model_data_basic() {
        let model = Model::n_link_pendulum(1, 1.0, 0.1);
        let mut data = model.make_data();

        // Initial position should be zero (equilibrium)
        assert_relative_eq!(data.qpos[0], 0.0, epsilon = 1e-12);

        // Start at 45 degrees (not equilibrium) so it will swing
        data.qpos[0] = std::f64::consts::FRAC_PI_4;

        for _ in 0..500 {
            data.step(&model).expect("step failed");
        }

        assert!(
            (data.qpos[0] - std::f64::consts::FRAC_PI_4).abs() > 1e-3,
            "Pendulum should swing"
        );
    }

    #[test]
    fn test_time_is_step_count_times_timestep() {
        let model = Model::n_link_pendulum(2, 0.5, 1.0);
        let mut data = model.make_data();

        for _ in 0..100 {
            data.step(&model).expect("step failed");
        }

        assert_eq!(data.nstep, 100);
        assert_eq!(data.time, 100.0 * model.timestep);
    }

    #[test]
    fn test_equilibrium_stays_put() {
        let model = Model::n_link_pendulum(3, 1.0, 1.0);
        let mut data = model.make_data();

        for _ in 0..1000 {
            data.step(&model).expect("step failed");
        }

        for i in 0..model.nq {
            assert_relative_eq!(data.qpos[i], 0.0, epsilon = 1e-12);
            assert_relative_eq!(data.qvel[i], 0.0, epsilon = 1e-12);
        }
    }
}
