//! Inclusion predicates over records.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PredicateError;
use crate::store::RecordStore;
use crate::types::Record;

/// Inclusive `[start, end]` date interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(NaiveDate, NaiveDate)", into = "(NaiveDate, NaiveDate)")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PredicateError> {
        if start > end {
            return Err(PredicateError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl TryFrom<(NaiveDate, NaiveDate)> for DateRange {
    type Error = PredicateError;

    fn try_from((start, end): (NaiveDate, NaiveDate)) -> Result<Self, Self::Error> {
        Self::new(start, end)
    }
}

impl From<DateRange> for (NaiveDate, NaiveDate) {
    fn from(r: DateRange) -> Self {
        (r.start, r.end)
    }
}

/// The active combination of filter selections.
///
/// Membership is an exact, case-sensitive match. An empty `regions` or `categories`
/// set selects nothing; it is never read as "no filter". Use
/// [`PredicateSet::select_all`] to start from every observed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredicateSet {
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    /// `None` means no date constraint.
    pub date_range: Option<DateRange>,
}

impl PredicateSet {
    pub fn new<R, C>(regions: R, categories: C) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            regions: regions.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
            date_range: None,
        }
    }

    /// Every region and category observed in `store`, no date bound.
    pub fn select_all(store: &RecordStore) -> Self {
        Self::new(store.regions().iter().cloned(), store.categories().iter().cloned())
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// True if either membership set is empty, so no record can match.
    pub fn selects_nothing(&self) -> bool {
        self.regions.is_empty() || self.categories.is_empty()
    }

    /// True if `record` satisfies all three predicates.
    pub fn matches(&self, record: &Record) -> bool {
        self.regions.contains(&record.region)
            && self.categories.contains(&record.category)
            && self
                .date_range
                .is_none_or(|range| range.contains(record.order_date))
    }
}

#[cfg(test)]
mod tests {
    use super::{DateRange, PredicateSet};
    use crate::error::PredicateError;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let err = DateRange::new(d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
        assert_eq!(
            err,
            PredicateError::InvertedRange {
                start: d(2024, 2, 1),
                end: d(2024, 1, 1)
            }
        );
    }

    #[test]
    fn date_range_is_inclusive() {
        let r = DateRange::new(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
        assert!(r.contains(d(2024, 1, 1)));
        assert!(r.contains(d(2024, 1, 31)));
        assert!(!r.contains(d(2023, 12, 31)));
        assert!(!r.contains(d(2024, 2, 1)));
        assert!(DateRange::single_day(d(2024, 5, 5)).contains(d(2024, 5, 5)));
    }

    #[test]
    fn empty_sets_select_nothing() {
        assert!(PredicateSet::new(Vec::<String>::new(), ["Office"]).selects_nothing());
        assert!(PredicateSet::new(["East"], Vec::<String>::new()).selects_nothing());
        assert!(!PredicateSet::new(["East"], ["Office"]).selects_nothing());
    }

    #[test]
    fn deserializes_from_json_description() {
        let json = r#"{
            "regions": ["East", "West"],
            "categories": ["Office"],
            "date_range": ["2024-01-01", "2024-03-31"]
        }"#;
        let p: PredicateSet = serde_json::from_str(json).unwrap();
        assert_eq!(p.regions.len(), 2);
        assert_eq!(p.date_range.unwrap().end(), d(2024, 3, 31));

        let inverted = r#"{"regions": [], "categories": [], "date_range": ["2024-03-01", "2024-01-01"]}"#;
        assert!(serde_json::from_str::<PredicateSet>(inverted).is_err());
    }
}
