//! Reduction of per-block growth into one `GrowthRecord` per
//! (organism, source, unit, probe).
//!
//! Every (catalog row x block) pair is independent, so they are evaluated in
//! parallel. The reduction is a sum, folded into an ordered map so the output
//! does not depend on evaluation order.
//!
//! When the catalog holds several rows for the same (organism, source), their
//! growth values are summed and the reported b1/T0 follow `DuplicatePolicy`.

use std::collections::{BTreeMap, HashMap};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{BlockKey, DuplicatePolicy, GrowthRecord, ModelKey, NormalizedModelParameter, TemperatureReading};
use crate::error::GrowthError;
use crate::growth::engine::{BlockGrowth, cumulative_growth};

#[derive(Debug, Clone)]
struct Accumulator {
    growth: f64,
    b1: f64,
    t0: f64,
}

/// Evaluate every model over every block and reduce to one record per key.
///
/// Records come back sorted by (organism, source, unit, probe).
pub fn aggregate_growth(
    params: &[NormalizedModelParameter],
    blocks: &BTreeMap<BlockKey, Vec<TemperatureReading>>,
    interval_minutes: u32,
    policy: DuplicatePolicy,
) -> Result<Vec<GrowthRecord>, GrowthError> {
    check_duplicates(params, policy)?;

    let pairs: Vec<(usize, BlockKey)> = (0..params.len())
        .flat_map(|i| blocks.keys().map(move |&b| (i, b)))
        .collect();

    // Indexed parallel collect keeps `pairs` order, so `First` stays catalog-ordered.
    let evaluated: Vec<(usize, BlockKey, BlockGrowth)> = pairs
        .par_iter()
        .map(|&(i, block)| {
            let growth = cumulative_growth(&blocks[&block], &params[i], interval_minutes);
            (i, block, growth)
        })
        .collect();

    let mut acc: BTreeMap<(ModelKey, BlockKey), Accumulator> = BTreeMap::new();
    for (i, block, growth) in evaluated {
        let param = &params[i];
        if growth.samples_missing > 0 {
            warn!(
                organism = %param.organism,
                source = %param.source_label,
                unit = block.unit_id,
                probe = block.probe_id,
                missing = growth.samples_missing,
                used = growth.samples_used,
                "missing temperature readings excluded from growth sum"
            );
        }

        acc.entry((param.key(), block))
            .and_modify(|a| {
                a.growth += growth.cumulative_growth;
                if policy == DuplicatePolicy::Max {
                    a.b1 = a.b1.max(param.coefficient_b1);
                    a.t0 = a.t0.max(param.threshold_t0);
                }
            })
            .or_insert(Accumulator {
                growth: growth.cumulative_growth,
                b1: param.coefficient_b1,
                t0: param.threshold_t0,
            });
    }

    let records: Vec<GrowthRecord> = acc
        .into_iter()
        .map(|((model, block), a)| GrowthRecord {
            organism: model.organism,
            source_label: model.source_label,
            unit_id: block.unit_id,
            probe_id: block.probe_id,
            cumulative_growth: a.growth,
            coefficient_b1: a.b1,
            threshold_t0: a.t0,
        })
        .collect();

    debug!(
        models = params.len(),
        blocks = blocks.len(),
        records = records.len(),
        "aggregated growth records"
    );
    Ok(records)
}

/// Warn about (or reject) catalog rows sharing an (organism, source) key.
fn check_duplicates(params: &[NormalizedModelParameter], policy: DuplicatePolicy) -> Result<(), GrowthError> {
    let mut counts: HashMap<ModelKey, usize> = HashMap::new();
    for p in params {
        *counts.entry(p.key()).or_default() += 1;
    }

    let mut dups: Vec<(&ModelKey, &usize)> = counts.iter().filter(|(_, n)| **n > 1).collect();
    dups.sort();
    for (key, rows) in dups {
        if policy == DuplicatePolicy::Reject {
            return Err(GrowthError::DuplicateModel {
                organism: key.organism.clone(),
                source_label: key.source_label.clone(),
            });
        }
        warn!(
            organism = %key.organism,
            source = %key.source_label,
            rows,
            policy = ?policy,
            "duplicate catalog rows for one model; growth summed across rows"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::engine::group_by_block;

    fn param(source: &str, b1: f64, t0: f64) -> NormalizedModelParameter {
        NormalizedModelParameter {
            organism: "Salmonella".to_string(),
            source_label: source.to_string(),
            coefficient_b1: b1,
            threshold_t0: t0,
        }
    }

    fn readings() -> Vec<TemperatureReading> {
        let mut out = Vec::new();
        for probe in 1..=2 {
            for i in 0..3 {
                out.push(TemperatureReading {
                    unit_id: 1,
                    probe_id: probe,
                    elapsed_minutes: 5 * i,
                    temperature_celsius: Some(10.0),
                });
            }
        }
        out
    }

    #[test]
    fn one_record_per_model_and_block() {
        let blocks = group_by_block(&readings());
        let params = vec![param("A", 0.1, 5.0), param("B", 0.1, 5.0)];
        let records = aggregate_growth(&params, &blocks, 5, DuplicatePolicy::Max).unwrap();
        assert_eq!(records.len(), 4);
        for r in &records {
            assert!((r.cumulative_growth - 0.0625).abs() < 1e-12);
        }
    }

    #[test]
    fn duplicates_sum_growth_and_keep_max_parameters() {
        let blocks = group_by_block(&readings());
        let params = vec![param("A", 0.1, 5.0), param("A", 0.05, 6.0)];
        let records = aggregate_growth(&params, &blocks, 5, DuplicatePolicy::Max).unwrap();
        assert_eq!(records.len(), 2);

        let single = cumulative_growth(&blocks[&BlockKey { unit_id: 1, probe_id: 1 }], &params[0], 5);
        let other = cumulative_growth(&blocks[&BlockKey { unit_id: 1, probe_id: 1 }], &params[1], 5);
        let r = &records[0];
        assert!((r.cumulative_growth - (single.cumulative_growth + other.cumulative_growth)).abs() < 1e-12);
        assert_eq!(r.coefficient_b1, 0.1);
        assert_eq!(r.threshold_t0, 6.0);
    }

    #[test]
    fn first_policy_keeps_catalog_order() {
        let blocks = group_by_block(&readings());
        let params = vec![param("A", 0.05, 6.0), param("A", 0.1, 5.0)];
        let records = aggregate_growth(&params, &blocks, 5, DuplicatePolicy::First).unwrap();
        assert_eq!(records[0].coefficient_b1, 0.05);
        assert_eq!(records[0].threshold_t0, 6.0);
    }

    #[test]
    fn reject_policy_fails_on_duplicates() {
        let blocks = group_by_block(&readings());
        let params = vec![param("A", 0.05, 6.0), param("A", 0.1, 5.0)];
        let err = aggregate_growth(&params, &blocks, 5, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, GrowthError::DuplicateModel { .. }));
    }
}
