//! Input data providers.
//!
//! - `series`: seeded synthetic temperature series for transport units

pub mod series;

pub use series::*;
