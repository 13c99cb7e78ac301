//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the growth/statistics code stays clean and testable
//! - output changes are localized

use std::collections::BTreeMap;

use crate::app::pipeline::RunOutput;
use crate::domain::{GrowthRecord, ModelKey, OrganismComparison};
use crate::stats::OrganismOutcome;

/// Growth distribution of one model across all blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelGrowthSummary {
    pub organism: String,
    pub source_label: String,
    pub blocks: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub coefficient_b1: f64,
    pub threshold_t0: f64,
}

/// Summarize growth per model, sorted by (organism, source).
pub fn summarize_growth(records: &[GrowthRecord]) -> Vec<ModelGrowthSummary> {
    let mut by_model: BTreeMap<ModelKey, Vec<&GrowthRecord>> = BTreeMap::new();
    for r in records {
        by_model
            .entry(ModelKey {
                organism: r.organism.clone(),
                source_label: r.source_label.clone(),
            })
            .or_default()
            .push(r);
    }

    by_model
        .into_iter()
        .map(|(key, rs)| {
            let values: Vec<f64> = rs.iter().map(|r| r.cumulative_growth).collect();
            let n = values.len();
            ModelGrowthSummary {
                organism: key.organism,
                source_label: key.source_label,
                blocks: n,
                mean: values.iter().sum::<f64>() / n as f64,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                coefficient_b1: rs[0].coefficient_b1,
                threshold_t0: rs[0].threshold_t0,
            }
        })
        .collect()
}

/// Format the full run summary (inputs + skipped models + growth table).
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== growth - cold-chain growth model comparison ===\n");
    out.push_str(&format!(
        "Catalog: rows={} | models={} | skipped={}\n",
        run.catalog_rows,
        run.models.len(),
        run.skipped.len()
    ));
    out.push_str(&format!(
        "Series: blocks={} | readings={} | missing={} | interval={}min\n",
        run.blocks, run.readings, run.missing_readings, run.interval_minutes
    ));
    for (label, reason) in &run.skipped {
        out.push_str(&format!("  (skipped {label}) {reason}\n"));
    }

    out.push_str("\nCumulative growth (log10 CFU) per model:\n");
    out.push_str(&format!(
        "{:<14} {:<32} {:>10} {:>8} {:>10} {:>10} {:>10}\n",
        "organism", "source", "b1", "T0", "mean", "min", "max"
    ));
    out.push_str(&format!(
        "{:-<14} {:-<32} {:-<10} {:-<8} {:-<10} {:-<10} {:-<10}\n",
        "", "", "", "", "", "", ""
    ));
    for s in summarize_growth(&run.records) {
        out.push_str(&format!(
            "{:<14} {:<32} {:>10.5} {:>8.2} {:>10.4} {:>10.4} {:>10.4}\n",
            truncate(&s.organism, 14),
            truncate(&s.source_label, 32),
            s.coefficient_b1,
            s.threshold_t0,
            s.mean,
            s.min,
            s.max
        ));
    }

    out
}

/// Format the statistical comparison of every organism.
pub fn format_comparisons(outcomes: &[OrganismOutcome]) -> String {
    let mut out = String::new();
    for o in outcomes {
        match &o.result {
            Ok(c) => out.push_str(&format_comparison(c)),
            Err(e) => out.push_str(&format!("\n[{}] comparison failed: {e}\n", o.organism)),
        }
    }
    out
}

fn format_comparison(c: &OrganismComparison) -> String {
    let mut out = String::new();
    let f = &c.friedman;

    out.push_str(&format!("\n[{}]\n", c.organism));
    out.push_str(&format!(
        "Friedman: chi2={:.4} df={} p={} (n={}, k={})\n",
        f.statistic,
        f.df,
        fmt_p(f.p_value),
        f.n_blocks,
        f.n_treatments
    ));
    out.push_str(&format!(
        "Kendall's W: {:.4} ({})\n",
        c.kendall_w,
        c.effect_magnitude.display_name()
    ));

    let mut ranked = c.treatments.clone();
    ranked.sort_by(|a, b| b.mean_rank.partial_cmp(&a.mean_rank).unwrap_or(std::cmp::Ordering::Equal));
    out.push_str("Models by mean rank (most growth first):\n");
    for t in &ranked {
        out.push_str(&format!(
            "  {:<32} rank={:.3} median={:.4} max={:.4}\n",
            truncate(&t.source_label, 32),
            t.mean_rank,
            t.median_growth,
            t.max_growth
        ));
    }

    out.push_str("Pairwise signed-rank (Bonferroni):\n");
    for p in &c.pairwise {
        out.push_str(&format!(
            "  {:<24} vs {:<24} V={:>8.1} p={:>10} p.adj={:>10} {}\n",
            truncate(&p.group1_label, 24),
            truncate(&p.group2_label, 24),
            p.statistic,
            fmt_p(p.raw_p),
            fmt_p(p.adjusted_p),
            p.significance_symbol
        ));
    }

    out
}

fn fmt_p(p: f64) -> String {
    if p < 1e-4 { format!("{p:.2e}") } else { format!("{p:.4}") }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
