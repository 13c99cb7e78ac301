//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during growth evaluation and testing
//! - exported to CSV/JSON
//! - constructed directly by callers that already hold materialized inputs

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One temperature sample from one probe of one transport unit.
///
/// `temperature_celsius` is `None` when the probe did not report a value at
/// this timestamp (a missing reading).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub unit_id: u32,
    pub probe_id: u32,
    pub elapsed_minutes: u32,
    pub temperature_celsius: Option<f64>,
}

impl TemperatureReading {
    /// The (unit, probe) block this reading belongs to.
    pub fn block(&self) -> BlockKey {
        BlockKey {
            unit_id: self.unit_id,
            probe_id: self.probe_id,
        }
    }

    /// The temperature, if present and finite.
    pub fn temperature(&self) -> Option<f64> {
        self.temperature_celsius.filter(|t| t.is_finite())
    }
}

/// A (transport unit, probe) pair: one block in the repeated-measures design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockKey {
    pub unit_id: u32,
    pub probe_id: u32,
}

/// Time unit the published rate coefficient is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBasis {
    Hourly,
    Daily,
}

/// Whether the published coefficient is already in square-root form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleForm {
    SquareRooted,
    Linear,
}

/// Logarithm base of the growth unit (log10 CFU vs ln CFU).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogBasis {
    Common,
    Natural,
}

/// The unit encoding of a published coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitBasis {
    pub time_basis: TimeBasis,
    pub scale_form: ScaleForm,
    pub log_basis: LogBasis,
}

impl UnitBasis {
    /// The basis every model is normalized into.
    pub const CANONICAL: UnitBasis = UnitBasis {
        time_basis: TimeBasis::Hourly,
        scale_form: ScaleForm::SquareRooted,
        log_basis: LogBasis::Common,
    };
}

/// A published secondary growth model as it appears in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawModelParameter {
    pub organism: String,
    pub source_label: String,
    pub coefficient_b: f64,
    pub threshold_t0: f64,
    pub units: UnitBasis,
}

impl RawModelParameter {
    pub fn key(&self) -> ModelKey {
        ModelKey {
            organism: self.organism.clone(),
            source_label: self.source_label.clone(),
        }
    }
}

/// Display/grouping key of a model: organism + source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelKey {
    pub organism: String,
    pub source_label: String,
}

/// A model whose coefficient is in the canonical basis
/// (common log, per hour, square-rooted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedModelParameter {
    pub organism: String,
    pub source_label: String,
    pub coefficient_b1: f64,
    pub threshold_t0: f64,
}

impl NormalizedModelParameter {
    pub fn key(&self) -> ModelKey {
        ModelKey {
            organism: self.organism.clone(),
            source_label: self.source_label.clone(),
        }
    }

    /// Express this parameter back as a catalog row in the canonical basis.
    pub fn to_raw(&self) -> RawModelParameter {
        RawModelParameter {
            organism: self.organism.clone(),
            source_label: self.source_label.clone(),
            coefficient_b: self.coefficient_b1,
            threshold_t0: self.threshold_t0,
            units: UnitBasis::CANONICAL,
        }
    }
}

/// Cumulative growth of one model over one (unit, probe) block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub organism: String,
    pub source_label: String,
    pub unit_id: u32,
    pub probe_id: u32,
    /// Cumulative log10(CFU) growth; never negative.
    pub cumulative_growth: f64,
    pub coefficient_b1: f64,
    pub threshold_t0: f64,
}

impl GrowthRecord {
    pub fn block(&self) -> BlockKey {
        BlockKey {
            unit_id: self.unit_id,
            probe_id: self.probe_id,
        }
    }
}

/// Which b1/T0 to attach when the catalog holds several rows for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the maximum b1 and the maximum T0 across duplicate rows.
    #[default]
    Max,
    /// Keep the values of the first row seen in catalog order.
    First,
    /// Fail with a duplicate-model error.
    Reject,
}

/// Friedman rank-sum test outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriedmanResult {
    pub statistic: f64,
    pub df: usize,
    pub p_value: f64,
    /// Number of blocks (n).
    pub n_blocks: usize,
    /// Number of treatments (k).
    pub n_treatments: usize,
}

/// Conventional interpretation bands for Kendall's W.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectMagnitude {
    Small,
    Moderate,
    Large,
}

impl EffectMagnitude {
    pub fn from_w(w: f64) -> Self {
        if w < 0.3 {
            EffectMagnitude::Small
        } else if w < 0.5 {
            EffectMagnitude::Moderate
        } else {
            EffectMagnitude::Large
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EffectMagnitude::Small => "small",
            EffectMagnitude::Moderate => "moderate",
            EffectMagnitude::Large => "large",
        }
    }
}

/// One Bonferroni-corrected Wilcoxon signed-rank comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseTestResult {
    pub group1_label: String,
    pub group2_label: String,
    /// Number of blocks compared (before dropping zero differences).
    pub n: usize,
    /// Signed-rank statistic V (sum of ranks of positive differences).
    pub statistic: f64,
    pub raw_p: f64,
    pub adjusted_p: f64,
    pub significance_symbol: String,
}

/// Per-model summary within one organism comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentSummary {
    pub source_label: String,
    pub mean_rank: f64,
    pub median_growth: f64,
    pub max_growth: f64,
}

/// Full statistical comparison of all models for one organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismComparison {
    pub organism: String,
    pub friedman: FriedmanResult,
    pub kendall_w: f64,
    pub effect_magnitude: EffectMagnitude,
    pub treatments: Vec<TreatmentSummary>,
    pub pairwise: Vec<PairwiseTestResult>,
}

/// Comparison outcome of one organism as written to the stats JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganismEntry {
    pub organism: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<OrganismComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A saved comparison file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub interval_minutes: u32,
    pub models: usize,
    pub blocks: usize,
    pub organisms: Vec<OrganismEntry>,
}

/// Parameters of the synthetic temperature series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesConfig {
    pub units: u32,
    pub probes_per_unit: u32,
    pub hours: f64,
    pub interval_minutes: u32,
    pub seed: u64,
    pub weibull_shape: f64,
    pub weibull_scale: f64,
    pub base_temp: f64,
    /// Probability that any single reading is missing.
    pub missing_rate: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub catalog_path: PathBuf,
    /// Read readings from this CSV; when absent a synthetic series is generated.
    pub series_path: Option<PathBuf>,
    pub series: SeriesConfig,
    /// Sampling interval applied to every reading during integration.
    pub interval_minutes: u32,
    pub duplicate_policy: DuplicatePolicy,
    /// Restrict statistics to these organisms (empty = all).
    pub organisms: Vec<String>,
    pub export_growth: Option<PathBuf>,
    pub export_stats: Option<PathBuf>,
}
