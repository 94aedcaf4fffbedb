//! Exports: per-record series results and fault datasets (CSV).
//!
//! The series export is meant to be easy to consume in spreadsheets or
//! downstream scripts. Fault datasets are written in the same schema
//! `ingest` reads, so simulated data can be fed straight back into `srgm fit`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Boundary, FaultData};
use crate::error::AppError;
use crate::report::SeriesRow;

/// Write fitted series to a CSV file.
pub fn write_series_csv(path: &Path, rows: &[SeriesRow]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "index,span,time,observed,cumulative_observed,mvf,intensity")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        writeln!(
            file,
            "{},{:.10},{:.10},{},{},{:.10},{:.10}",
            r.index,
            r.span,
            r.time,
            r.observed.map(|v| format!("{v}")).unwrap_or_default(),
            r.cumulative_observed.map(|v| format!("{v}")).unwrap_or_default(),
            r.mvf,
            r.intensity,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write a fault dataset as `time,fault,type`.
pub fn write_fault_csv(path: &Path, data: &FaultData) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create fault CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["time", "fault", "type"])
        .map_err(|e| AppError::new(2, format!("Failed to write fault CSV header: {e}")))?;
    for rec in data.records() {
        let kind = match rec.boundary {
            Boundary::CountOnly => "0",
            Boundary::Exact => "1",
        };
        writer
            .write_record([rec.span.to_string(), rec.count.to_string(), kind.to_string()])
            .map_err(|e| AppError::new(2, format!("Failed to write fault CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush fault CSV: {e}")))?;

    Ok(())
}
