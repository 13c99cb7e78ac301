//! Result exports.
//!
//! - growth table CSV: one row per (organism, source, unit, probe)
//! - comparison JSON: Friedman / Kendall's W / post-hoc results per organism
//!
//! Both are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::Utc;

use crate::domain::{GrowthRecord, OrganismEntry, StatsFile};
use crate::error::AppError;
use crate::stats::OrganismOutcome;

/// Write the growth table to a CSV file.
pub fn write_growth_csv(path: &Path, records: &[GrowthRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create growth CSV '{}': {e}", path.display())))?;
    write_growth(file, records)
}

/// Write the growth table to any writer.
pub fn write_growth<W: Write>(writer: W, records: &[GrowthRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(["organism", "source", "unit", "probe", "growth", "b1", "t0"])
        .map_err(|e| AppError::new(2, format!("Failed to write growth CSV header: {e}")))?;

    for r in records {
        writer
            .write_record([
                r.organism.clone(),
                r.source_label.clone(),
                r.unit_id.to_string(),
                r.probe_id.to_string(),
                format!("{:.10}", r.cumulative_growth),
                format!("{:.10}", r.coefficient_b1),
                format!("{:.4}", r.threshold_t0),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write growth CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush growth CSV: {e}")))?;
    Ok(())
}

/// Build the serializable comparison document.
pub fn build_stats_file(outcomes: &[OrganismOutcome], interval_minutes: u32, models: usize, blocks: usize) -> StatsFile {
    let organisms = outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(c) => OrganismEntry {
                organism: o.organism.clone(),
                comparison: Some(c.clone()),
                error: None,
            },
            Err(e) => OrganismEntry {
                organism: o.organism.clone(),
                comparison: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    StatsFile {
        tool: "growth".to_string(),
        generated_at: Utc::now(),
        interval_minutes,
        models,
        blocks,
        organisms,
    }
}

/// Write the comparison JSON file.
pub fn write_stats_json(path: &Path, stats: &StatsFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create stats JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, stats)
        .map_err(|e| AppError::new(2, format!("Failed to write stats JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrowthError;

    #[test]
    fn growth_csv_has_one_row_per_record() {
        let records = vec![GrowthRecord {
            organism: "Listeria".to_string(),
            source_label: "Author, 2004".to_string(),
            unit_id: 3,
            probe_id: 2,
            cumulative_growth: 0.0625,
            coefficient_b1: 0.1,
            threshold_t0: 5.0,
        }];
        let mut buf = Vec::new();
        write_growth(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "organism,source,unit,probe,growth,b1,t0");
        // Fields containing commas are quoted.
        assert!(lines[1].starts_with("Listeria,\"Author, 2004\",3,2,0.0625"));
    }

    #[test]
    fn stats_file_keeps_errors() {
        let outcomes = vec![OrganismOutcome {
            organism: "Salmonella".to_string(),
            result: Err(GrowthError::InsufficientData("k=1".to_string())),
        }];
        let stats = build_stats_file(&outcomes, 5, 1, 4);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"error\":\"insufficient data: k=1\""));
        assert!(!json.contains("\"comparison\""));
    }
}
