//! `snaphome-runtime` – homing decisions.
//!
//! Compares the remembered home snapshot with the current one and turns the
//! differences into a single steering vector.
//!
//! # Modules
//!
//! - [`homing`] – [`compute_homing_vector`][homing::compute_homing_vector]:
//!   feature correspondence, turn and approach vectors, and their weighted
//!   combination under a [`HomingConfig`][homing::HomingConfig].
//! - [`field`] – [`FieldEvaluator`][field::FieldEvaluator]: sweeps a grid of
//!   positions, optionally in parallel, and reports the angular error of the
//!   homing vectors against the true bearing home.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: installs the
//!   global `tracing` subscriber for binaries.

pub mod field;
pub mod homing;
pub mod telemetry;

pub use field::{FieldEvaluator, FieldReport, FieldSample, GridSpec, SkippedCell};
pub use homing::{
    Correspondence, HomingConfig, HomingVector, compute_homing_vector, correspondences,
};
pub use telemetry::init_tracing;
