//! Growth evaluation over temperature series.
//!
//! Responsibilities:
//!
//! - integrate a model's growth rate over one (unit, probe) series (`engine`)
//! - evaluate every (model x block) pair and reduce to one record per key (`aggregate`)

pub mod aggregate;
pub mod engine;

pub use aggregate::*;
pub use engine::*;
