//! Command-line parsing for the growth model comparison tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the growth/statistics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DuplicatePolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "growth", version, about = "Cold-chain microbial growth model comparison")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute cumulative growth for every catalog model and compare models per organism.
    Run(RunArgs),
    /// Write a synthetic temperature series to CSV.
    Simulate(SimulateArgs),
}

/// Options for a full comparison run.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Model catalog CSV (Organism, b, Units, T0, Source).
    #[arg(long, value_name = "CSV")]
    pub catalog: PathBuf,

    /// Temperature series CSV (unit, probe, minute, temperature).
    /// A synthetic series is generated when omitted.
    #[arg(long, value_name = "CSV")]
    pub series: Option<PathBuf>,

    #[command(flatten)]
    pub synthetic: SeriesArgs,

    /// Policy for catalog rows sharing an (organism, source) pair.
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Max)]
    pub duplicate_policy: DuplicatePolicy,

    /// Only compare these organisms (repeatable).
    #[arg(long = "organism")]
    pub organisms: Vec<String>,

    /// Export the per-block growth table to CSV.
    #[arg(long = "export-growth")]
    pub export_growth: Option<PathBuf>,

    /// Export the statistical comparison to JSON.
    #[arg(long = "export-stats")]
    pub export_stats: Option<PathBuf>,
}

/// Options for writing a synthetic series.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub synthetic: SeriesArgs,

    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,
}

/// Synthetic temperature series settings.
#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Number of transport units.
    #[arg(long, default_value_t = 10)]
    pub units: u32,

    /// Probes per transport unit.
    #[arg(long, default_value_t = 3)]
    pub probes: u32,

    /// Transport duration (hours).
    #[arg(long, default_value_t = 48.0)]
    pub hours: f64,

    /// Sampling interval (minutes).
    #[arg(long, default_value_t = 5)]
    pub interval_minutes: u32,

    /// Random seed for the synthetic series.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Weibull shape of the temperature excursion above base.
    #[arg(long, default_value_t = 1.5)]
    pub weibull_shape: f64,

    /// Weibull scale (°C) of the temperature excursion above base.
    #[arg(long, default_value_t = 4.0)]
    pub weibull_scale: f64,

    /// Base (set-point) temperature (°C).
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub base_temp: f64,

    /// Probability that a reading is missing.
    #[arg(long, default_value_t = 0.0)]
    pub missing_rate: f64,
}
