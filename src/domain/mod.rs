//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input records (`TemperatureReading`, `RawModelParameter`) and their unit tags
//! - normalized model parameters and per-block growth records
//! - statistical comparison outputs and the run configuration

pub mod types;

pub use types::*;
