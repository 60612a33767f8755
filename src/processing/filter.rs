//! Applying a [`PredicateSet`] to a [`RecordStore`].

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::processing::PredicateSet;
use crate::store::RecordStore;
use crate::types::Record;

/// Records of a store that matched a predicate set, in store order.
///
/// Borrows from the store; it is recomputed, never updated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    pub(crate) fn from_refs(records: Vec<&'a Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` records, for previews.
    pub fn head(&self, n: usize) -> &[&'a Record] {
        &self.records[..n.min(self.records.len())]
    }
}

impl Serialize for FilteredView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.iter())
    }
}

/// Returns the records of `store` matching every predicate in `predicates`.
///
/// An empty region or category set yields an empty view.
pub fn apply<'a>(store: &'a RecordStore, predicates: &PredicateSet) -> FilteredView<'a> {
    if predicates.selects_nothing() {
        debug!("empty selection; filtered view is empty");
        return FilteredView::default();
    }

    let records: Vec<&Record> = store
        .records()
        .iter()
        .filter(|r| predicates.matches(r))
        .collect();

    debug!(input = store.len(), output = records.len(), "filter applied");
    FilteredView { records }
}

#[cfg(test)]
mod tests {
    use super::apply;
    use crate::processing::{DateRange, PredicateSet};
    use crate::store::RecordStore;
    use crate::types::Record;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn rec(id: &str, region: &str, category: &str, date: (i32, u32, u32)) -> Record {
        let day = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        Record {
            order_id: id.to_string(),
            order_date: day,
            ship_date: day,
            region: region.to_string(),
            category: category.to_string(),
            sub_category: "Misc".to_string(),
            segment: "Consumer".to_string(),
            sales: Decimal::ONE,
            profit: Decimal::ZERO,
        }
    }

    fn sample_store() -> RecordStore {
        RecordStore::from_records(vec![
            rec("1", "East", "Furniture", (2024, 1, 1)),
            rec("2", "West", "Furniture", (2024, 1, 15)),
            rec("3", "East", "Office", (2024, 1, 31)),
            rec("4", "east", "Office", (2024, 2, 1)),
        ])
    }

    fn ids(view: &super::FilteredView<'_>) -> Vec<String> {
        view.iter().map(|r| r.order_id.clone()).collect()
    }

    #[test]
    fn membership_is_case_sensitive() {
        let store = sample_store();
        let p = PredicateSet::new(["East"], ["Furniture", "Office"]);
        assert_eq!(ids(&apply(&store, &p)), ["1", "3"]);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let store = sample_store();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .unwrap();
        let p = PredicateSet::select_all(&store).with_date_range(range);
        assert_eq!(ids(&apply(&store, &p)), ["2", "3", "4"]);
    }

    #[test]
    fn empty_region_set_selects_nothing() {
        let store = sample_store();
        let p = PredicateSet::new(Vec::<String>::new(), ["Furniture"]);
        assert!(apply(&store, &p).is_empty());
    }

    #[test]
    fn select_all_is_pass_through() {
        let store = sample_store();
        let view = apply(&store, &PredicateSet::select_all(&store));
        assert_eq!(view.len(), store.len());
    }

    #[test]
    fn view_borrows_store_records() {
        let store = sample_store();
        let view = apply(&store, &PredicateSet::new(["West"], ["Furniture"]));
        assert!(std::ptr::eq(view.records()[0], &store.records()[1]));
        assert_eq!(view.head(10).len(), 1);
        assert!(view.head(0).is_empty());
    }
}
