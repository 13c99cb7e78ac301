//! `coldchain-growth` library crate.
//!
//! Estimates cumulative microbial growth on produce during refrigerated
//! transport under several published square-root growth models, then compares
//! the models per organism (Friedman, Kendall's W, Bonferroni-corrected
//! signed-rank post-hoc tests).
//!
//! The binary (`growth`) is a thin wrapper around this library so that the
//! pipeline is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod growth;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod stats;
