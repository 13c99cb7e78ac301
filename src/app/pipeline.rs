//! Shared growth pipeline.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! catalog -> normalization -> per-block growth -> aggregation -> statistics
//!
//! The CLI front-end can then focus on presentation and exports.

use std::collections::BTreeMap;

use tracing::{error, info, warn};

use crate::domain::{BlockKey, DuplicatePolicy, GrowthRecord, NormalizedModelParameter, RawModelParameter, TemperatureReading};
use crate::error::AppError;
use crate::growth::{aggregate_growth, group_by_block};
use crate::models::normalize_all;
use crate::stats::{OrganismOutcome, compare_all};

/// Inputs of one pipeline run, already materialized in memory.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub catalog: Vec<RawModelParameter>,
    /// Catalog rows that failed to load, with a label and reason.
    pub catalog_errors: Vec<(String, String)>,
    pub readings: Vec<TemperatureReading>,
    pub interval_minutes: u32,
    pub duplicate_policy: DuplicatePolicy,
    /// Organisms to compare (empty = all).
    pub organisms: Vec<String>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub catalog_rows: usize,
    pub models: Vec<NormalizedModelParameter>,
    /// Models that never reached growth computation, and why.
    pub skipped: Vec<(String, String)>,
    pub blocks: usize,
    pub readings: usize,
    pub missing_readings: usize,
    pub interval_minutes: u32,
    pub records: Vec<GrowthRecord>,
    pub comparisons: Vec<OrganismOutcome>,
}

/// Execute the full pipeline on in-memory inputs.
pub fn run_pipeline(input: PipelineInput) -> Result<RunOutput, AppError> {
    if input.interval_minutes == 0 {
        return Err(AppError::new(2, "Sampling interval must be > 0 minutes."));
    }
    let catalog_rows = input.catalog.len() + input.catalog_errors.len();

    // 1) Normalize every model; failures drop only that model.
    let (models, failed) = normalize_all(&input.catalog);
    let mut skipped = input.catalog_errors;
    for (raw, err) in failed {
        let label = format!("{} / {}", raw.organism, raw.source_label);
        error!(model = %label, error = %err, "model skipped");
        skipped.push((label, err.to_string()));
    }
    if models.is_empty() {
        return Err(AppError::new(3, "No valid models remain after normalization."));
    }
    info!(models = models.len(), skipped = skipped.len(), "normalized model catalog");

    // 2) Group readings into (unit, probe) blocks.
    let blocks: BTreeMap<BlockKey, Vec<TemperatureReading>> = group_by_block(&input.readings);
    if blocks.is_empty() {
        return Err(AppError::new(3, "Temperature series contains no readings."));
    }
    let missing_readings = input.readings.iter().filter(|r| r.temperature().is_none()).count();
    if missing_readings > 0 {
        warn!(missing = missing_readings, total = input.readings.len(), "series has missing readings");
    }
    info!(blocks = blocks.len(), readings = input.readings.len(), "grouped temperature series");

    // 3) Growth per (model, block), reduced to one record per key.
    let records = aggregate_growth(&models, &blocks, input.interval_minutes, input.duplicate_policy)?;
    info!(records = records.len(), "computed cumulative growth");

    // 4) Statistics per organism; each organism fails independently.
    let comparisons = compare_all(&records, &input.organisms);
    let failed_orgs = comparisons.iter().filter(|c| c.result.is_err()).count();
    info!(organisms = comparisons.len(), failed = failed_orgs, "compared growth models");

    Ok(RunOutput {
        catalog_rows,
        models,
        skipped,
        blocks: blocks.len(),
        readings: input.readings.len(),
        missing_readings,
        interval_minutes: input.interval_minutes,
        records,
        comparisons,
    })
}
