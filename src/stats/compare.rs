//! Per-organism comparison driver.
//!
//! The comparison needs the complete, aggregated record set of an organism;
//! it is run only after aggregation has finished.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use tracing::{debug, error};

use crate::domain::{EffectMagnitude, GrowthRecord, OrganismComparison, TreatmentSummary};
use crate::error::GrowthError;
use crate::stats::design::BlockDesign;
use crate::stats::friedman::{friedman_test, kendall_w};
use crate::stats::posthoc::pairwise_signed_rank;

/// Comparison outcome for one organism; a failure affects only that organism.
#[derive(Debug, Clone)]
pub struct OrganismOutcome {
    pub organism: String,
    pub result: Result<OrganismComparison, GrowthError>,
}

/// Compare all models of `organism` using the records that belong to it.
pub fn compare_organism(records: &[GrowthRecord], organism: &str) -> Result<OrganismComparison, GrowthError> {
    let subset: Vec<GrowthRecord> = records.iter().filter(|r| r.organism == organism).cloned().collect();
    let design = BlockDesign::from_records(&subset)?;

    let friedman = friedman_test(&design);
    let w = kendall_w(&friedman.result);
    let n = design.n_blocks() as f64;

    let treatments = design
        .treatments
        .iter()
        .enumerate()
        .map(|(j, label)| {
            let column = design.column(j);
            TreatmentSummary {
                source_label: label.clone(),
                mean_rank: friedman.rank_sums[j] / n,
                median_growth: median(&column),
                max_growth: column.iter().copied().fold(0.0, f64::max),
            }
        })
        .collect();

    let pairwise = pairwise_signed_rank(&design);

    debug!(
        organism,
        n = friedman.result.n_blocks,
        k = friedman.result.n_treatments,
        statistic = friedman.result.statistic,
        p = friedman.result.p_value,
        kendall_w = w,
        "friedman test"
    );

    Ok(OrganismComparison {
        organism: organism.to_string(),
        friedman: friedman.result,
        kendall_w: w,
        effect_magnitude: EffectMagnitude::from_w(w),
        treatments,
        pairwise,
    })
}

/// Compare every organism present in `records` (or only those in `only`).
///
/// Organisms are processed in sorted order.
pub fn compare_all(records: &[GrowthRecord], only: &[String]) -> Vec<OrganismOutcome> {
    let organisms: BTreeSet<&str> = records
        .iter()
        .map(|r| r.organism.as_str())
        .filter(|o| only.is_empty() || only.iter().any(|w| w == o))
        .collect();

    organisms
        .into_iter()
        .map(|organism| {
            let result = compare_organism(records, organism);
            if let Err(e) = &result {
                error!(organism, error = %e, "statistical comparison failed");
            }
            OrganismOutcome {
                organism: organism.to_string(),
                result,
            }
        })
        .collect()
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(organism: &str, source: &str, probe: u32, growth: f64) -> GrowthRecord {
        GrowthRecord {
            organism: organism.to_string(),
            source_label: source.to_string(),
            unit_id: 1,
            probe_id: probe,
            cumulative_growth: growth,
            coefficient_b1: 0.1,
            threshold_t0: 5.0,
        }
    }

    #[test]
    fn identical_models_are_not_significant() {
        let records = vec![
            rec("Listeria", "A", 1, 0.0625),
            rec("Listeria", "B", 1, 0.0625),
            rec("Listeria", "A", 2, 0.0625),
            rec("Listeria", "B", 2, 0.0625),
        ];
        let cmp = compare_organism(&records, "Listeria").unwrap();
        assert_eq!(cmp.friedman.statistic, 0.0);
        assert!(cmp.friedman.p_value > 0.05);
        assert_eq!(cmp.kendall_w, 0.0);
        assert_eq!(cmp.effect_magnitude, EffectMagnitude::Small);
        assert_eq!(cmp.pairwise.len(), 1);
        assert_eq!(cmp.pairwise[0].significance_symbol, "ns");
        assert_eq!(cmp.treatments[0].mean_rank, 1.5);
    }

    #[test]
    fn failures_stay_within_their_organism() {
        let records = vec![
            rec("Listeria", "A", 1, 0.1),
            rec("Listeria", "B", 1, 0.2),
            rec("Listeria", "A", 2, 0.3),
            rec("Listeria", "B", 2, 0.5),
            // Only one model for Salmonella.
            rec("Salmonella", "A", 1, 0.1),
            rec("Salmonella", "A", 2, 0.1),
        ];
        let outcomes = compare_all(&records, &[]);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(outcomes[1].result, Err(GrowthError::InsufficientData(_))));

        let only = compare_all(&records, &["Listeria".to_string()]);
        assert_eq!(only.len(), 1);
    }

    #[test]
    fn treatment_summary_orders_models() {
        let records = vec![
            rec("E. coli", "Low", 1, 0.1),
            rec("E. coli", "High", 1, 0.9),
            rec("E. coli", "Low", 2, 0.2),
            rec("E. coli", "High", 2, 1.1),
            rec("E. coli", "Low", 3, 0.3),
            rec("E. coli", "High", 3, 1.3),
        ];
        let cmp = compare_organism(&records, "E. coli").unwrap();
        let high = cmp.treatments.iter().find(|t| t.source_label == "High").unwrap();
        assert_eq!(high.mean_rank, 2.0);
        assert!((high.median_growth - 1.1).abs() < 1e-12);
        assert!((high.max_growth - 1.3).abs() < 1e-12);
        assert!((cmp.kendall_w - 1.0).abs() < 1e-12);
        assert_eq!(cmp.effect_magnitude, EffectMagnitude::Large);
    }
}
