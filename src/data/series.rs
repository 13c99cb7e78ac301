//! Synthetic refrigerated-transport temperature series.
//!
//! Each transport unit gets its own Weibull scale (the configured scale with
//! log-normal jitter), and every probe reading is
//!
//! ```text
//! T = base_temp + Weibull(unit_scale, shape)
//! ```
//!
//! sampled every `interval_minutes` for `hours`. Readings can be dropped at
//! random to exercise the missing-reading path. Output is fully determined by
//! the seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Normal, Weibull};

use crate::domain::{SeriesConfig, TemperatureReading};
use crate::error::AppError;

/// Std dev of the log-normal jitter applied to each unit's Weibull scale.
const UNIT_SCALE_JITTER: f64 = 0.2;

pub fn generate_series(config: &SeriesConfig) -> Result<Vec<TemperatureReading>, AppError> {
    if config.units == 0 || config.probes_per_unit == 0 {
        return Err(AppError::new(2, "Unit and probe counts must be > 0."));
    }
    if config.interval_minutes == 0 {
        return Err(AppError::new(2, "Sampling interval must be > 0 minutes."));
    }
    if !(config.hours.is_finite() && config.hours > 0.0) {
        return Err(AppError::new(2, "Series duration must be a positive number of hours."));
    }
    if !(config.weibull_shape.is_finite()
        && config.weibull_scale.is_finite()
        && config.weibull_shape > 0.0
        && config.weibull_scale > 0.0)
    {
        return Err(AppError::new(2, "Invalid Weibull shape/scale settings."));
    }
    if !config.base_temp.is_finite() {
        return Err(AppError::new(2, "Invalid base temperature."));
    }
    if !(0.0..1.0).contains(&config.missing_rate) {
        return Err(AppError::new(2, "Missing-reading rate must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let jitter = Normal::new(0.0, UNIT_SCALE_JITTER)
        .map_err(|e| AppError::new(4, format!("Jitter distribution error: {e}")))?;

    let samples = series_len(config)?;
    let total = config
        .units
        .checked_mul(config.probes_per_unit)
        .and_then(|blocks| blocks.checked_mul(samples))
        .ok_or_else(|| AppError::new(2, "Too many readings: units x probes x samples overflows."))?;
    let mut out = Vec::with_capacity(total as usize);

    for unit_id in 1..=config.units {
        let unit_scale = config.weibull_scale * jitter.sample(&mut rng).exp();
        let weibull = Weibull::new(unit_scale, config.weibull_shape)
            .map_err(|e| AppError::new(4, format!("Weibull distribution error: {e:?}")))?;

        for probe_id in 1..=config.probes_per_unit {
            for i in 0..samples {
                let temperature = config.base_temp + weibull.sample(&mut rng);
                let missing = config.missing_rate > 0.0 && rng.gen_bool(config.missing_rate);
                out.push(TemperatureReading {
                    unit_id,
                    probe_id,
                    elapsed_minutes: i * config.interval_minutes,
                    temperature_celsius: (!missing).then_some(temperature),
                });
            }
        }
    }

    Ok(out)
}

/// Samples per probe; the last sample's elapsed minute must fit in `u32`.
fn series_len(config: &SeriesConfig) -> Result<u32, AppError> {
    let samples = (config.hours * 60.0 / f64::from(config.interval_minutes)).floor();
    if samples > f64::from(u32::MAX) {
        return Err(AppError::new(2, "Series duration is too long for the sampling interval."));
    }
    let samples = samples as u32;
    samples
        .saturating_sub(1)
        .checked_mul(config.interval_minutes)
        .ok_or_else(|| AppError::new(2, "Series duration is too long: elapsed minutes overflow."))?;
    Ok(samples)
}
