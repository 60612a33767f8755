use chrono::NaiveDate;
use thiserror::Error;

use crate::types::GroupKey;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for aggregation operations.
pub type AggregationResult<T> = Result<T, AggregationError>;

/// Convenience result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Error type returned by ingestion functions.
///
/// Ingestion is all-or-nothing: any of these aborts the whole load and no partial
/// [`crate::store::RecordStore`] is produced.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing error (unbalanced quotes, ragged rows, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON syntax error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input cannot be interpreted as rows at all (unknown format, non-object JSON rows).
    #[error("unsupported input: {message}")]
    Unsupported { message: String },

    /// A required field is absent or blank.
    #[error("missing required field '{field}' at row {row}")]
    MissingField { row: usize, field: String },

    /// A date field does not match the configured [`crate::types::DateFormat`].
    #[error("malformed date at row {row} field '{field}': '{raw}' does not match {expected}")]
    MalformedDate {
        row: usize,
        field: String,
        raw: String,
        expected: &'static str,
    },

    /// A sales/profit field is not a valid amount.
    #[error("invalid amount at row {row} field '{field}': {message} (raw='{raw}')")]
    InvalidAmount {
        row: usize,
        field: String,
        raw: String,
        message: String,
    },
}

/// Error building a [`crate::processing::PredicateSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    /// Lower date bound is after the upper bound.
    #[error("inverted date range: {start} is after {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Error returned by [`crate::processing::aggregate::try_aggregate`] under
/// [`crate::processing::EmptyViewPolicy::Fail`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// The filtered view has no records, so no group can be produced.
    #[error("cannot aggregate by {group_by}: filtered view is empty")]
    EmptyView { group_by: GroupKey },
}

/// Error returned when serializing a filtered view.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Error constructing an [`crate::execution::ExecutionEngine`].
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// An option is out of range (zero chunk size, zero threads, ...).
    #[error("invalid execution options: {message}")]
    InvalidOptions { message: String },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
