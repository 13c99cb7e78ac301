//! Friedman rank-sum test and Kendall's W.
//!
//! Within each block the k treatment values are ranked (ties averaged), rank
//! sums `R_j` are taken over the n blocks, and
//!
//! ```text
//! Q = 12 / (n k (k + 1)) * sum_j R_j^2 - 3 n (k + 1)
//! ```
//!
//! is referred to a chi-square distribution with `k - 1` degrees of freedom.
//! Kendall's `W = Q / (n (k - 1))`.

use nalgebra::DVector;

use crate::domain::FriedmanResult;
use crate::math::chi_square_sf;
use crate::stats::design::BlockDesign;
use crate::stats::rank::average_ranks;

/// Friedman result plus the per-treatment rank sums it was computed from.
#[derive(Debug, Clone)]
pub struct FriedmanOutput {
    pub result: FriedmanResult,
    /// `R_j`, in treatment order.
    pub rank_sums: Vec<f64>,
}

/// Run the Friedman test on a complete block design.
pub fn friedman_test(design: &BlockDesign) -> FriedmanOutput {
    let n = design.n_blocks();
    let k = design.n_treatments();

    let mut rank_sums = DVector::<f64>::zeros(k);
    for row in design.values.row_iter() {
        let values: Vec<f64> = row.iter().copied().collect();
        for (j, r) in average_ranks(&values).into_iter().enumerate() {
            rank_sums[j] += r;
        }
    }

    let n_f = n as f64;
    let k_f = k as f64;
    let q = 12.0 / (n_f * k_f * (k_f + 1.0)) * rank_sums.norm_squared() - 3.0 * n_f * (k_f + 1.0);
    // Q is a sum of squared deviations; clear float noise below zero.
    let statistic = q.max(0.0);
    let df = k - 1;

    FriedmanOutput {
        result: FriedmanResult {
            statistic,
            df,
            p_value: chi_square_sf(statistic, df),
            n_blocks: n,
            n_treatments: k,
        },
        rank_sums: rank_sums.iter().copied().collect(),
    }
}

/// Kendall's coefficient of concordance from a Friedman statistic.
pub fn kendall_w(result: &FriedmanResult) -> f64 {
    let denom = result.n_blocks as f64 * (result.n_treatments as f64 - 1.0);
    if denom <= 0.0 {
        return 0.0;
    }
    (result.statistic / denom).clamp(0.0, 1.0)
}
