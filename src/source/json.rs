use super::{
    InventorySource, SourceError, COL_COMPUTER, COL_DRIVE, COL_FREE, COL_TOTAL, COL_UPDATED,
};
use crate::models::disk::DiskRow;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

/// Reads a JSON export of the `DiskSpace` table (`SELECT * FROM DiskSpace`
/// serialised as an array of records).
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InventorySource for JsonFileSource {
    fn fetch_disk_rows(&self) -> Result<Vec<DiskRow>, SourceError> {
        let text = fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path:   self.path.clone(),
            source: e,
        })?;
        let rows = parse_records(&text)?;
        info!(path = %self.path.display(), rows = rows.len(), "loaded disk inventory");
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Validate a JSON array of `DiskSpace` records into typed rows.
/// Unknown columns are ignored; a missing required column rejects the load.
pub fn parse_records(text: &str) -> Result<Vec<DiskRow>, SourceError> {
    let value: Value = serde_json::from_str(text)?;
    let records = match value {
        Value::Array(v) => v,
        _               => return Err(SourceError::NotAnArray),
    };

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| match rec {
            Value::Object(map) => parse_record(i, map),
            _                  => Err(SourceError::NotAnObject { row: i }),
        })
        .collect()
}

fn parse_record(row: usize, map: &Map<String, Value>) -> Result<DiskRow, SourceError> {
    let computer      = text_field(row, map, COL_COMPUTER)?;
    let drive         = text_field(row, map, COL_DRIVE)?;
    let total_size_gb = number_field(row, map, COL_TOTAL)?;
    let free_space_gb = number_field(row, map, COL_FREE)?;

    let updated_at = map.get(COL_UPDATED).and_then(coerce_timestamp);
    if updated_at.is_none() {
        debug!(row, computer = %computer, drive = %drive, "unknown {}", COL_UPDATED);
    }

    Ok(DiskRow::new(computer, drive, total_size_gb, free_space_gb, updated_at))
}

fn text_field(row: usize, map: &Map<String, Value>, column: &'static str) -> Result<String, SourceError> {
    match map.get(column) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _                      => Err(SourceError::MissingField { row, column }),
    }
}

// Numeric columns arrive either as JSON numbers or as numeric strings
// (DECIMAL columns are often exported as text).
fn number_field(row: usize, map: &Map<String, Value>, column: &'static str) -> Result<f64, SourceError> {
    let invalid = |value: String| SourceError::InvalidNumber { row, column, value };
    let v = match map.get(column) {
        None | Some(Value::Null) => return Err(SourceError::MissingField { row, column }),
        Some(Value::Number(n))   => n.as_f64().ok_or_else(|| invalid(n.to_string()))?,
        Some(Value::String(s))   => s.trim().parse::<f64>().map_err(|_| invalid(s.clone()))?,
        Some(other)              => return Err(invalid(other.to_string())),
    };
    if v.is_finite() { Ok(v) } else { Err(invalid(v.to_string())) }
}

/// Best-effort timestamp coercion; `None` means "unknown".
/// Integers are epoch milliseconds, as pandas `to_json` writes datetimes.
pub fn coerce_timestamp(v: &Value) -> Option<NaiveDateTime> {
    match v {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        _ => None,
    }
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() { return None; }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
