//! Growth-rate evaluation for a normalized square-root model.
//!
//! The secondary model is
//!
//! ```text
//! sqrt(mu) = b1 * (T - T0)         for T > T0
//! mu       = 0                     otherwise
//! ```
//!
//! with `mu` in log10(CFU) per hour. Integrating over one sample window of
//! `interval` minutes gives the per-sample increment.

use crate::domain::NormalizedModelParameter;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Instantaneous growth rate (log10 CFU / h) at `temperature`.
pub fn growth_rate(temperature: f64, param: &NormalizedModelParameter) -> f64 {
    let diff = (temperature - param.threshold_t0).max(0.0);
    let root = diff * param.coefficient_b1;
    root * root
}

/// Growth accrued over one sample window of `interval_minutes`.
pub fn growth_increment(temperature: f64, param: &NormalizedModelParameter, interval_minutes: u32) -> f64 {
    growth_rate(temperature, param) * (f64::from(interval_minutes) / MINUTES_PER_HOUR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(b1: f64, t0: f64) -> NormalizedModelParameter {
        NormalizedModelParameter {
            organism: "Listeria".to_string(),
            source_label: "test".to_string(),
            coefficient_b1: b1,
            threshold_t0: t0,
        }
    }

    #[test]
    fn increment_matches_closed_form() {
        // (5^2 * 0.1^2) * 5/60
        let inc = growth_increment(10.0, &param(0.1, 5.0), 5);
        assert!((inc - 0.25 / 12.0).abs() < 1e-12, "got {inc}");
    }

    #[test]
    fn below_threshold_is_exactly_zero() {
        let p = param(0.3, 2.0);
        assert_eq!(growth_increment(-40.0, &p, 5), 0.0);
        assert_eq!(growth_increment(2.0, &p, 5), 0.0);
    }
}
