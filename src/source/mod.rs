pub mod json;

use crate::models::disk::DiskRow;
use std::path::PathBuf;
use thiserror::Error;

pub use json::JsonFileSource;

/// Column names of the inventory `DiskSpace` table.
pub const COL_COMPUTER: &str = "ComputerName";
pub const COL_DRIVE:    &str = "Drive";
pub const COL_TOTAL:    &str = "TotalSize_GB";
pub const COL_FREE:     &str = "FreeSpace_GB";
pub const COL_UPDATED:  &str = "UpdateTimeStamp";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected a JSON array of DiskSpace rows")]
    NotAnArray,

    #[error("row {row}: expected a JSON object")]
    NotAnObject { row: usize },

    #[error("row {row}: missing required column {column}")]
    MissingField { row: usize, column: &'static str },

    #[error("row {row}: column {column} is not a finite number: {value}")]
    InvalidNumber { row: usize, column: &'static str, value: String },
}

/// Anything that can hand the report an already-materialised set of disk rows.
pub trait InventorySource {
    fn fetch_disk_rows(&self) -> Result<Vec<DiskRow>, SourceError>;

    /// Human-readable origin for logs and headers.
    fn describe(&self) -> String;
}
