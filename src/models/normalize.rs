//! Conversion of published coefficients into one canonical basis.
//!
//! Published square-root models disagree on three unit dimensions:
//!
//! - power form: `b` for `sqrt(mu)` vs `b` for `mu` itself
//! - time: per hour vs per day
//! - log base: log10 CFU vs ln CFU
//!
//! Since growth is computed as `(b1 * dT)^2`, a conversion factor `c` on the
//! rate becomes `sqrt(c)` on the coefficient:
//!
//! - `linear`  -> `b = sqrt(b)`
//! - `daily`   -> `b = b / sqrt(24)`
//! - `natural` -> `b = b / sqrt(ln 10)`
//!
//! The square root is taken first; the two divisions then commute.

use crate::domain::{LogBasis, NormalizedModelParameter, RawModelParameter, ScaleForm, TimeBasis};
use crate::error::GrowthError;

const HOURS_PER_DAY: f64 = 24.0;

/// Normalize one catalog row into the canonical basis.
pub fn normalize(raw: &RawModelParameter) -> Result<NormalizedModelParameter, GrowthError> {
    let b = raw.coefficient_b;
    if !b.is_finite() || b < 0.0 {
        return Err(GrowthError::ParameterFormat(format!(
            "coefficient b for '{} / {}' must be a finite non-negative number, got {b}",
            raw.organism, raw.source_label
        )));
    }
    if !raw.threshold_t0.is_finite() {
        return Err(GrowthError::ParameterFormat(format!(
            "T0 for '{} / {}' is not finite",
            raw.organism, raw.source_label
        )));
    }

    let mut b1 = match raw.units.scale_form {
        ScaleForm::SquareRooted => b,
        ScaleForm::Linear => b.sqrt(),
    };
    if raw.units.time_basis == TimeBasis::Daily {
        b1 /= HOURS_PER_DAY.sqrt();
    }
    if raw.units.log_basis == LogBasis::Natural {
        b1 /= std::f64::consts::LN_10.sqrt();
    }

    Ok(NormalizedModelParameter {
        organism: raw.organism.clone(),
        source_label: raw.source_label.clone(),
        coefficient_b1: b1,
        threshold_t0: raw.threshold_t0,
    })
}

/// Normalize a whole catalog, keeping failures alongside the rows that failed.
///
/// Returned pairs keep catalog order.
pub fn normalize_all(
    catalog: &[RawModelParameter],
) -> (Vec<NormalizedModelParameter>, Vec<(RawModelParameter, GrowthError)>) {
    let mut ok = Vec::with_capacity(catalog.len());
    let mut failed = Vec::new();
    for raw in catalog {
        match normalize(raw) {
            Ok(p) => ok.push(p),
            Err(e) => failed.push((raw.clone(), e)),
        }
    }
    (ok, failed)
}
