//! Input/output helpers.
//!
//! - model catalog CSV ingest + unit decoding (`catalog`)
//! - temperature series CSV read/write (`series`)
//! - growth table / comparison exports (`export`)

pub mod catalog;
pub mod export;
pub mod series;

pub use catalog::*;
pub use export::*;
pub use series::*;
