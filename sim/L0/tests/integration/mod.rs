//! Integration tests for the sim-* crates.
//!
//! These tests verify end-to-end functionality:
//! - MJCF loading → Model/Data addressing and stepping
//! - Joint name resolution against loaded models
//! - Environment lifecycle: pause, step budget, shutdown
//! - Initial joint overrides at load and on reset
//! - Pause/reset command handlers

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::cast_precision_loss
)]

pub mod fixtures;

pub mod environment;
pub mod initial_state;
pub mod mjcf_pipeline;
pub mod services;
