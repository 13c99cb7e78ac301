//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and installs logging
//! - parses CLI arguments
//! - loads the catalog and the temperature series (or simulates one)
//! - runs the growth pipeline and statistics
//! - prints reports and writes optional exports

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, RunArgs, SeriesArgs, SimulateArgs};
use crate::domain::{RunConfig, SeriesConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `growth` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Simulate(args) => handle_simulate(args),
    }
}

/// Install the stderr log subscriber (`RUST_LOG`, default `info`).
fn init_logging() {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);

    let loaded = crate::io::load_catalog(&config.catalog_path)?;
    let catalog_errors: Vec<(String, String)> = loaded
        .row_errors
        .iter()
        .map(|e| {
            warn!(line = e.line, error = %e.error, "catalog row skipped");
            (format!("catalog line {}", e.line), e.error.to_string())
        })
        .collect();

    let readings = match &config.series_path {
        Some(path) => crate::io::load_series(path)?,
        None => {
            info!(seed = config.series.seed, units = config.series.units, "generating synthetic series");
            crate::data::generate_series(&config.series)?
        }
    };

    let run = pipeline::run_pipeline(pipeline::PipelineInput {
        catalog: loaded.params,
        catalog_errors,
        readings,
        interval_minutes: config.interval_minutes,
        duplicate_policy: config.duplicate_policy,
        organisms: config.organisms.clone(),
    })?;

    println!("{}", crate::report::format_run_summary(&run));
    println!("{}", crate::report::format_comparisons(&run.comparisons));

    // Optional exports.
    if let Some(path) = &config.export_growth {
        crate::io::write_growth_csv(path, &run.records)?;
        info!(path = %path.display(), "wrote growth table");
    }
    if let Some(path) = &config.export_stats {
        let stats = crate::io::build_stats_file(&run.comparisons, run.interval_minutes, run.models.len(), run.blocks);
        crate::io::write_stats_json(path, &stats)?;
        info!(path = %path.display(), "wrote comparison JSON");
    }

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let series = series_config_from_args(&args.synthetic);
    let readings = crate::data::generate_series(&series)?;
    crate::io::write_series_csv(&args.out, &readings)?;
    info!(path = %args.out.display(), readings = readings.len(), "wrote synthetic series");
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    RunConfig {
        catalog_path: args.catalog.clone(),
        series_path: args.series.clone(),
        series: series_config_from_args(&args.synthetic),
        interval_minutes: args.synthetic.interval_minutes,
        duplicate_policy: args.duplicate_policy,
        organisms: args.organisms.clone(),
        export_growth: args.export_growth.clone(),
        export_stats: args.export_stats.clone(),
    }
}

pub fn series_config_from_args(args: &SeriesArgs) -> SeriesConfig {
    SeriesConfig {
        units: args.units,
        probes_per_unit: args.probes,
        hours: args.hours,
        interval_minutes: args.interval_minutes,
        seed: args.seed,
        weibull_shape: args.weibull_shape,
        weibull_scale: args.weibull_scale,
        base_temp: args.base_temp,
        missing_rate: args.missing_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn run_args_map_to_config() {
        let cli = Cli::parse_from([
            "growth",
            "run",
            "--catalog",
            "models.csv",
            "--units",
            "4",
            "--base-temp",
            "-1.5",
            "--duplicate-policy",
            "first",
            "--organism",
            "Listeria",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        let config = run_config_from_args(&args);
        assert_eq!(config.series.units, 4);
        assert_eq!(config.series.base_temp, -1.5);
        assert_eq!(config.interval_minutes, 5);
        assert_eq!(config.duplicate_policy, crate::domain::DuplicatePolicy::First);
        assert_eq!(config.organisms, vec!["Listeria".to_string()]);
        assert!(config.series_path.is_none());
    }
}
