//! Pairwise post-hoc comparisons with Bonferroni correction.

use crate::domain::PairwiseTestResult;
use crate::stats::design::BlockDesign;
use crate::stats::wilcoxon::signed_rank_test;

/// Significance thresholds, strictest first.
const SIGNIFICANCE_LEVELS: [(f64, &str); 4] = [(0.0001, "****"), (0.001, "***"), (0.01, "**"), (0.05, "*")];

/// Bonferroni-adjusted p-value for a family of `m` comparisons.
pub fn bonferroni(raw_p: f64, m: usize) -> f64 {
    (raw_p * m as f64).min(1.0)
}

/// Map an (adjusted) p-value to its significance symbol.
pub fn significance_symbol(p: f64) -> &'static str {
    SIGNIFICANCE_LEVELS
        .iter()
        .find(|(cut, _)| p < *cut)
        .map(|(_, sym)| *sym)
        .unwrap_or("ns")
}

/// Paired signed-rank tests for every unordered treatment pair.
///
/// Pairs are emitted in treatment order: (0,1), (0,2), ..., (k-2,k-1).
pub fn pairwise_signed_rank(design: &BlockDesign) -> Vec<PairwiseTestResult> {
    let k = design.n_treatments();
    let m = k * k.saturating_sub(1) / 2;
    let columns: Vec<Vec<f64>> = (0..k).map(|j| design.column(j)).collect();

    let mut out = Vec::with_capacity(m);
    for a in 0..k {
        for b in (a + 1)..k {
            let test = signed_rank_test(&columns[a], &columns[b]);
            let adjusted_p = bonferroni(test.p_value, m);
            out.push(PairwiseTestResult {
                group1_label: design.treatments[a].clone(),
                group2_label: design.treatments[b].clone(),
                n: design.n_blocks(),
                statistic: test.statistic,
                raw_p: test.p_value,
                adjusted_p,
                significance_symbol: significance_symbol(adjusted_p).to_string(),
            });
        }
    }
    out
}
