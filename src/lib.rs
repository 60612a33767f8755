//! `sales-report` is a filter-and-aggregate reporting engine over tabular sales records.
//!
//! Raw rows (CSV, JSON, or string-keyed maps) are parsed once into an immutable
//! [`store::RecordStore`]. A [`processing::PredicateSet`] selects regions, categories and an
//! optional order-date range; applying it yields a [`processing::FilteredView`], from which
//! the aggregate views and the KPI snapshot of a [`report::Report`] are derived.
//!
//! ## Pipeline
//!
//! ```text
//! RecordStore ──apply(PredicateSet)──▶ FilteredView ──┬──▶ AggregateView × 7
//!                                                     └──▶ KpiSnapshot
//! ```
//!
//! Every stage is a deterministic function of its inputs, so the same selections always
//! produce the same report, whether computed sequentially ([`report::run`]) or on a thread
//! pool ([`execution::ExecutionEngine::report`]).
//!
//! ## Quick example
//!
//! ```rust
//! use sales_report::ingestion::csv::ingest_csv_from_str;
//! use sales_report::ingestion::LoadOptions;
//! use sales_report::processing::PredicateSet;
//! use sales_report::report::{self, ReportView};
//! use sales_report::types::Measure;
//! use rust_decimal::Decimal;
//!
//! let input = "\
//! Order ID,Order Date,Ship Date,Region,Category,Sub-Category,Segment,Sales,Profit
//! R1,2024-01-15,2024-01-17,East,Furniture,Chairs,Consumer,100,10
//! R2,2024-01-20,2024-01-22,West,Furniture,Chairs,Consumer,50,-5
//! R3,2024-02-01,2024-02-04,East,Office,Binders,Corporate,30,6
//! ";
//! let store = ingest_csv_from_str(input, &LoadOptions::default())?;
//!
//! let predicates = PredicateSet::new(["East"], ["Furniture", "Office"]);
//! let report = report::run(&store, &predicates);
//!
//! assert_eq!(report.filtered.len(), 2);
//! let by_category = report.view(ReportView::CategorySales).unwrap();
//! assert_eq!(by_category.value("Furniture", Measure::Sales), Some(Decimal::from(100)));
//! assert_eq!(report.kpi.total_profit, Decimal::from(16));
//! assert_eq!(report.kpi.distinct_orders, 2);
//! # Ok::<(), sales_report::IngestionError>(())
//! ```
//!
//! ## Selections
//!
//! An empty region or category set selects nothing. Callers that want an untouched filter
//! to pass everything through start from [`processing::PredicateSet::select_all`], or use a
//! [`session::Session`], which does so on creation.
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV/JSON adapters, row parsing and ingestion observers
//! - [`store`]: the immutable record store
//! - [`processing`]: predicates, filtering, aggregation and KPIs
//! - [`report`]: the named result set of one filter application
//! - [`session`]: explicit context object holding the store and current selections
//! - [`execution`]: parallel pipeline execution with metrics
//! - [`export`]: CSV serialization of a filtered view
//! - [`types`]: record model, grouping keys and measures
//! - [`error`]: error types

pub mod error;
pub mod execution;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod report;
pub mod session;
pub mod store;
pub mod types;

pub use error::{
    AggregationError, ExecutionError, ExportError, IngestionError, IngestionResult, PredicateError,
};
