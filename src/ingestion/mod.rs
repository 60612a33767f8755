//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - parses every row into a typed record, failing the whole load on the first bad row
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Already-split rows can be loaded directly with [`crate::store::RecordStore::load`].
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]

pub mod csv;
pub mod json;
pub mod observability;
pub mod record;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    StdErrObserver, TracingObserver,
};
pub use record::{parse_record, LoadOptions, MAX_AMOUNT};
pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions};
