//! Error handling for the reporting pipeline.
//!
//! Operations return [`Result`], an `anyhow` result carrying context strings.
//! Failures the callers need to react to programmatically are expressed as
//! [`Error`] variants and recovered with `downcast_ref`, most importantly
//! [`Error::ColumnNotFound`], which report assembly treats as "skip this
//! section" rather than a fatal condition.

pub mod util;

use chrono::NaiveDate;

/// Domain errors for loading, filtering and aggregating loan records
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The selected date range has its start after its end
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// A column expected by an operation is absent from the table
    #[error("column '{column}' not found in record batch")]
    ColumnNotFound { column: String },

    /// A column exists but does not hold the expected data type
    #[error("column '{column}' has unexpected type (expected {expected})")]
    InvalidDataType { column: String, expected: String },

    /// A source file does not match any known dataset layout
    #[error("unrecognized dataset: {name}")]
    UnknownDataset { name: String },

    /// The boundary file declares a coordinate system that cannot be parsed
    #[error("unsupported coordinate reference system: {name}")]
    UnsupportedCrs { name: String },

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from an Arrow kernel or reader
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),
}

/// Result type for reporting operations
pub type Result<T> = anyhow::Result<T>;

/// Check whether an error chain bottoms out in a missing column.
///
/// Report builders use this to tell "the table simply lacks this field"
/// apart from real failures: the former degrades a single section, the
/// latter aborts the view.
#[must_use]
pub fn is_missing_column(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<Error>(), Some(Error::ColumnNotFound { .. }))
}
