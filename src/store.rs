//! The immutable, in-memory record store.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::IngestionResult;
use crate::ingestion::record::{parse_record, LoadOptions};
use crate::processing::DateRange;
use crate::types::{RawRow, Record};

/// Ordered, immutable sequence of [`Record`]s built once from parsed input.
///
/// Distinct values used to populate filter option lists are computed at load time and
/// returned in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
    regions: Vec<String>,
    categories: Vec<String>,
    sub_categories: Vec<String>,
    segments: Vec<String>,
    date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl RecordStore {
    /// Parse every raw row into a record. A single bad row fails the whole load.
    ///
    /// Rows are numbered from 1 in errors.
    ///
    /// ```rust
    /// use sales_report::ingestion::LoadOptions;
    /// use sales_report::store::RecordStore;
    /// use sales_report::types::RawRow;
    ///
    /// let row: RawRow = [
    ///     ("Order ID", "CA-1"),
    ///     ("Order Date", "2024-01-15"),
    ///     ("Ship Date", "2024-01-17"),
    ///     ("Region", "East"),
    ///     ("Category", "Furniture"),
    ///     ("Sub-Category", "Chairs"),
    ///     ("Segment", "Consumer"),
    ///     ("Sales", "100"),
    ///     ("Profit", "10"),
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let store = RecordStore::load(vec![row], &LoadOptions::default()).unwrap();
    /// assert_eq!(store.len(), 1);
    /// assert_eq!(store.regions(), ["East".to_string()]);
    /// ```
    pub fn load<I>(raw_rows: I, options: &LoadOptions) -> IngestionResult<Self>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let records = raw_rows
            .into_iter()
            .enumerate()
            .map(|(idx0, raw)| parse_record(idx0 + 1, &raw, options))
            .collect::<IngestionResult<Vec<_>>>()?;
        Ok(Self::from_records(records))
    }

    /// Build a store from already-typed records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let regions = distinct(&records, |r| &r.region);
        let categories = distinct(&records, |r| &r.category);
        let sub_categories = distinct(&records, |r| &r.sub_category);
        let segments = distinct(&records, |r| &r.segment);
        let date_bounds = records.iter().map(|r| r.order_date).fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        });

        debug!(
            records = records.len(),
            regions = regions.len(),
            categories = categories.len(),
            "record store built"
        );

        Self {
            records,
            regions,
            categories,
            sub_categories,
            segments,
            date_bounds,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct regions, first-seen order.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Distinct categories, first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Distinct sub-categories, first-seen order.
    pub fn sub_categories(&self) -> &[String] {
        &self.sub_categories
    }

    /// Distinct segments, first-seen order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Earliest and latest order date, or `None` for an empty store.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.date_bounds
            .and_then(|(lo, hi)| DateRange::new(lo, hi).ok())
    }
}

fn distinct<F>(records: &[Record], field: F) -> Vec<String>
where
    F: Fn(&Record) -> &String,
{
    let mut seen = HashSet::new();
    records
        .iter()
        .map(field)
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}
