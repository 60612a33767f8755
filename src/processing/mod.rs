//! The filter → aggregate → summarize pipeline.
//!
//! Every stage is a pure function of its inputs:
//!
//! - [`apply()`]: a [`PredicateSet`] over a [`crate::store::RecordStore`] gives a [`FilteredView`]
//! - [`aggregate()`]: grouped sums over a filtered view give an [`AggregateView`]
//! - [`summarize()`]: scalar totals over a filtered view give a [`KpiSnapshot`]
//!
//! ## Example: filter → aggregate → summarize
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use sales_report::processing::{aggregate, apply, summarize, AggregateRequest, PredicateSet};
//! use sales_report::store::RecordStore;
//! use sales_report::types::{GroupKey, Measure, Record};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let rec = |id: &str, region: &str, sales: i64| Record {
//!     order_id: id.to_string(),
//!     order_date: day,
//!     ship_date: day,
//!     region: region.to_string(),
//!     category: "Furniture".to_string(),
//!     sub_category: "Chairs".to_string(),
//!     segment: "Consumer".to_string(),
//!     sales: Decimal::from(sales),
//!     profit: Decimal::ZERO,
//! };
//! let store = RecordStore::from_records(vec![rec("A", "East", 100), rec("B", "West", 50)]);
//!
//! let view = apply(&store, &PredicateSet::new(["East"], ["Furniture"]));
//! let by_category = aggregate(&view, &AggregateRequest::new(GroupKey::Category).measure(Measure::Sales));
//! assert_eq!(by_category.value("Furniture", Measure::Sales), Some(Decimal::from(100)));
//! assert_eq!(summarize(&view).distinct_orders, 1);
//! ```

pub mod aggregate;
pub mod filter;
pub mod kpi;
pub mod predicate;

pub use aggregate::{
    aggregate, try_aggregate, AggregateRequest, AggregateView, EmptyViewPolicy, Group, GroupOrder,
};
pub use filter::{apply, FilteredView};
pub use kpi::{summarize, KpiSnapshot};
pub use predicate::{DateRange, PredicateSet};
