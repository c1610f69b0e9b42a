//! Error types for dataset loading and querying.
//!
//! Schema problems are fatal and surface once, while the table is being
//! loaded. The aggregation functions themselves never fail.

use std::path::PathBuf;
use thiserror::Error;

/// The dataset does not match the fixed report schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The header row is missing entirely.
    #[error("dataset has no header row")]
    EmptyHeader,

    /// Required columns are absent from the header.
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A cell could not be parsed as the column's type.
    #[error("row {row}, column `{column}`: invalid value {value:?} (expected {expected})")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A row could not be split into the header's fields.
    #[error("row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

/// Errors raised by the tabular-query layer.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fatal configuration error: the dataset has the wrong shape.
    #[error("configuration error: {0}")]
    Configuration(#[from] SchemaError),

    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reader failure below the row level (I/O while streaming the file).
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A query referenced a table that was never loaded.
    #[error("unknown source `{0}` (load it with load_table first)")]
    UnknownSource(String),
}

impl PipelineError {
    /// Returns true for schema-level errors that abort the whole report.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PipelineError::Configuration(_))
    }
}
