//! Mathematical utilities: special functions for distribution tails.

pub mod special;

pub use special::*;
