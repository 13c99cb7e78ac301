//! Temperature-series CSV read/write.
//!
//! Schema: `unit,probe,minute,temperature`. An empty or `NA` temperature is a
//! missing reading and is kept as `None`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::TemperatureReading;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
struct SeriesRow {
    unit: u32,
    probe: u32,
    minute: u32,
    temperature: Option<String>,
}

/// Read a temperature series from a CSV file.
pub fn load_series(path: &Path) -> Result<Vec<TemperatureReading>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open series CSV '{}': {e}", path.display())))?;
    read_series(file)
}

/// Read a temperature series from any CSV reader.
pub fn read_series<R: Read>(reader: R) -> Result<Vec<TemperatureReading>, AppError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut out = Vec::new();
    for (idx, result) in reader.deserialize::<SeriesRow>().enumerate() {
        let line = idx + 2;
        let row = result.map_err(|e| AppError::new(2, format!("Invalid series row at line {line}: {e}")))?;
        let temperature_celsius = match row.temperature.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("na") => None,
            Some(s) => Some(s.parse::<f64>().map_err(|e| {
                AppError::new(2, format!("Invalid temperature '{s}' at line {line}: {e}"))
            })?),
        };
        out.push(TemperatureReading {
            unit_id: row.unit,
            probe_id: row.probe,
            elapsed_minutes: row.minute,
            temperature_celsius,
        });
    }

    if out.is_empty() {
        return Err(AppError::new(3, "Temperature series contains no readings."));
    }
    Ok(out)
}

/// Write a temperature series to a CSV file.
pub fn write_series_csv(path: &Path, readings: &[TemperatureReading]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create series CSV '{}': {e}", path.display())))?;
    write_series(file, readings)
}

/// Write a temperature series to any writer.
pub fn write_series<W: Write>(writer: W, readings: &[TemperatureReading]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    for r in readings {
        writer
            .serialize(SeriesRow {
                unit: r.unit_id,
                probe: r.probe_id,
                minute: r.elapsed_minutes,
                temperature: r.temperature_celsius.map(|t| format!("{t:.4}")),
            })
            .map_err(|e| AppError::new(2, format!("Failed to write series CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush series CSV: {e}")))?;
    Ok(())
}
