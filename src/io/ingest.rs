//! CSV ingest and normalization.
//!
//! This module turns a fault-count CSV into a validated [`FaultData`].
//!
//! Expected columns (case-insensitive, BOM-tolerant):
//! - time span since the previous record: `time` | `span` | `interval`
//! - faults observed in the span: `fault` | `count` | `faults` | `num`
//! - optional boundary flag: `type` | `exact` | `flag`
//!   (`1`/`exact`/`true` marks an exact failure time; `0`/`count`/empty does not)
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Strict rows**: each span is relative to the previous record, so one bad
//!   row would shift every later record in time. Any row error rejects the file
//!   (exit code 2) with every offending line listed.
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{Boundary, FaultData, FaultRecord};
use crate::error::AppError;

const SPAN_COLUMNS: [&str; 3] = ["time", "span", "interval"];
const COUNT_COLUMNS: [&str; 4] = ["fault", "count", "faults", "num"];
const TYPE_COLUMNS: [&str; 3] = ["type", "exact", "flag"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Ingest output: validated data.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub data: FaultData,
    pub rows_read: usize,
}

/// Load a fault-count CSV from disk.
pub fn load_fault_data(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = read_fault_data(file)?;
    debug!(
        path = %path.display(),
        rows = ingested.rows_read,
        used = ingested.data.len(),
        "loaded fault data"
    );
    Ok(ingested)
}

/// Parse fault records from any CSV reader.
pub fn read_fault_data<R: Read>(source: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let span_idx = find_column(&header_map, &SPAN_COLUMNS)
        .ok_or_else(|| AppError::new(2, "Missing required time-span column (`time`, `span`, or `interval`)."))?;
    let count_idx = find_column(&header_map, &COUNT_COLUMNS).ok_or_else(|| {
        AppError::new(2, "Missing required fault-count column (`fault`, `count`, `faults`, or `num`).")
    })?;
    let type_idx = find_column(&header_map, &TYPE_COLUMNS);

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, span_idx, count_idx, type_idx) {
            Ok(rec) => records.push(rec),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        for err in &row_errors {
            warn!(line = err.line, "rejected row: {}", err.message);
        }
        return Err(row_errors_to_app_error(&row_errors));
    }
    if records.is_empty() {
        return Err(AppError::new(3, "No valid rows remain after parsing."));
    }
    let data = FaultData::new(records)?;

    Ok(IngestedData { data, rows_read })
}

fn row_errors_to_app_error(errors: &[RowError]) -> AppError {
    const SHOWN: usize = 10;
    let mut message = format!("{} invalid row(s) in fault CSV:", errors.len());
    for err in errors.iter().take(SHOWN) {
        message.push_str(&format!("\n  {err}"));
    }
    if errors.len() > SHOWN {
        message.push_str(&format!("\n  ... and {} more", errors.len() - SHOWN));
    }
    AppError::new(2, message)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|n| header_map.get(*n).copied())
}

fn parse_row(
    record: &StringRecord,
    span_idx: usize,
    count_idx: usize,
    type_idx: Option<usize>,
) -> Result<FaultRecord, String> {
    let span = parse_non_negative(record.get(span_idx), "time span")?;
    let count = parse_non_negative(record.get(count_idx), "fault count")?;
    let boundary = match type_idx.and_then(|i| record.get(i)) {
        Some(raw) => parse_boundary(raw)?,
        None => Boundary::CountOnly,
    };
    Ok(FaultRecord { span, count, boundary })
}

fn parse_non_negative(raw: Option<&str>, what: &str) -> Result<f64, String> {
    let raw = raw.filter(|s| !s.is_empty()).ok_or_else(|| format!("Missing {what}."))?;
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("Invalid {what} `{raw}`."))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{what} must be finite and >= 0, got `{raw}`."));
    }
    Ok(value)
}

fn parse_boundary(raw: &str) -> Result<Boundary, String> {
    match raw.to_ascii_lowercase().as_str() {
        "" | "0" | "count" | "false" => Ok(Boundary::CountOnly),
        "1" | "exact" | "true" => Ok(Boundary::Exact),
        other => Err(format!("Invalid boundary type `{other}` (expected 0/1, count/exact).")),
    }
}
