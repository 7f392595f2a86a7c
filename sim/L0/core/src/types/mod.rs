//! Core type definitions for the MuJoCo-aligned physics pipeline.
//!
//! This module contains the fundamental types that flow through every stage of
//! the simulation: enums, Model, and Data.

pub(crate) mod enums;

mod data;
mod model;
mod model_factories;
mod model_init;

pub use data::Data;
pub use enums::*;
pub use model::Model;
