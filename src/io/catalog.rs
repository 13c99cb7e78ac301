//! Model-parameter catalog ingest.
//!
//! Turns a published-model table (CSV) into typed `RawModelParameter`s.
//!
//! Expected columns (case-insensitive, BOM tolerated):
//! `Organism`, `b` (or `coefficient b`), `Units`, `T0`, `Source`.
//!
//! The free-text `Units` column is inspected exactly once, here:
//! - contains `h`              -> hourly, else daily
//! - contains `sqrt` or `√`    -> already square-rooted, else linear
//! - contains `Ln`             -> natural log, else common log
//!
//! Rows that fail to parse are reported in `row_errors` and skipped; the
//! remaining rows are still usable.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{LogBasis, RawModelParameter, ScaleForm, TimeBasis, UnitBasis};
use crate::error::{AppError, GrowthError};

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub error: GrowthError,
}

/// Catalog ingest output.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub params: Vec<RawModelParameter>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load the catalog from a CSV file.
pub fn load_catalog(path: &Path) -> Result<LoadedCatalog, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open catalog CSV '{}': {e}", path.display())))?;
    read_catalog(file)
}

/// Load the catalog from any CSV reader.
pub fn read_catalog<R: Read>(reader: R) -> Result<LoadedCatalog, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read catalog headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    for required in ["organism", "b", "units", "t0", "source"] {
        if !header_map.contains_key(required) {
            return Err(AppError::new(2, format!("Missing required catalog column: `{required}`")));
        }
    }

    let mut params = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| GrowthError::ParameterFormat(format!("CSV parse error: {e}")))
            .and_then(|record| parse_row(&record, &header_map));
        match parsed {
            Ok(p) => params.push(p),
            Err(error) => row_errors.push(RowError { line, error }),
        }
    }

    Ok(LoadedCatalog {
        params,
        row_errors,
        rows_read,
    })
}

/// Decode a free-text units string into its unit tags.
pub fn parse_units(units: &str) -> Result<UnitBasis, GrowthError> {
    let units = units.trim();
    if units.is_empty() {
        return Err(GrowthError::ParameterFormat("empty Units value".to_string()));
    }

    let time_basis = if units.contains('h') {
        TimeBasis::Hourly
    } else {
        TimeBasis::Daily
    };
    let lower = units.to_lowercase();
    let scale_form = if lower.contains("sqrt") || units.contains('√') {
        ScaleForm::SquareRooted
    } else {
        ScaleForm::Linear
    };
    let log_basis = if units.contains("Ln") {
        LogBasis::Natural
    } else {
        LogBasis::Common
    };

    Ok(UnitBasis {
        time_basis,
        scale_form,
        log_basis,
    })
}

/// Citation text with parentheses removed, used as the model's display key.
pub fn clean_source(source: &str) -> String {
    source
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .collect::<String>()
        .trim()
        .to_string()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<RawModelParameter, GrowthError> {
    let organism = get_required(record, header_map, "organism")?.to_string();
    let coefficient_b = parse_f64(get_required(record, header_map, "b")?, "b")?;
    let units = parse_units(get_required(record, header_map, "units")?)?;
    let threshold_t0 = parse_f64(get_required(record, header_map, "t0")?, "T0")?;
    let source_label = clean_source(get_required(record, header_map, "source")?);
    if source_label.is_empty() {
        return Err(GrowthError::ParameterFormat("empty Source value".to_string()));
    }

    Ok(RawModelParameter {
        organism,
        source_label,
        coefficient_b,
        threshold_t0,
        units,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase();
    match name.as_str() {
        "coefficient b" | "coefficient_b" => "b".to_string(),
        _ => name,
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, GrowthError> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| GrowthError::ParameterFormat(format!("missing column `{name}`")))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| GrowthError::ParameterFormat(format!("missing value for `{name}`")))
}

fn parse_f64(s: &str, name: &str) -> Result<f64, GrowthError> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GrowthError::ParameterFormat(format!("invalid number '{s}' for `{name}`")))
}
