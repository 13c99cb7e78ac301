//! Per-block growth integration.
//!
//! For one normalized model and the readings of one (unit, probe) block:
//!
//! ```text
//! growth = sum_i (max(0, T_i - T0) * b1)^2 * interval / 60
//! ```
//!
//! Every term is non-negative, so the running total never decreases and
//! partial sums over contiguous slices add up to the full total.

use std::collections::BTreeMap;

use crate::domain::{BlockKey, NormalizedModelParameter, TemperatureReading};
use crate::models::growth_increment;

/// Integrated growth for one block, with reading counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockGrowth {
    pub cumulative_growth: f64,
    pub samples_used: usize,
    /// Readings without a usable temperature; excluded from the sum.
    pub samples_missing: usize,
}

/// Integrate growth for one model over one block's readings.
///
/// Readings whose temperature is absent or non-finite contribute nothing and
/// are counted in `samples_missing`.
pub fn cumulative_growth(
    readings: &[TemperatureReading],
    param: &NormalizedModelParameter,
    interval_minutes: u32,
) -> BlockGrowth {
    let mut total = 0.0;
    let mut used = 0usize;
    let mut missing = 0usize;

    for reading in readings {
        match reading.temperature() {
            Some(t) => {
                total += growth_increment(t, param, interval_minutes);
                used += 1;
            }
            None => missing += 1,
        }
    }

    BlockGrowth {
        cumulative_growth: total,
        samples_used: used,
        samples_missing: missing,
    }
}

/// Group readings by (unit, probe), each group ordered by elapsed time.
///
/// The sort is stable, so readings sharing a timestamp keep input order.
pub fn group_by_block(readings: &[TemperatureReading]) -> BTreeMap<BlockKey, Vec<TemperatureReading>> {
    let mut blocks: BTreeMap<BlockKey, Vec<TemperatureReading>> = BTreeMap::new();
    for r in readings {
        blocks.entry(r.block()).or_default().push(*r);
    }
    for series in blocks.values_mut() {
        series.sort_by_key(|r| r.elapsed_minutes);
    }
    blocks
}
