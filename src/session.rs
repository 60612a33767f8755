//! Request-scoped context holding the loaded store and the current selections.
//!
//! A [`Session`] keeps the parsed [`RecordStore`] across filter changes and recomputes the
//! filtered view and every derived result from scratch on each call.

use std::sync::Arc;

use crate::error::PredicateError;
use crate::execution::ExecutionEngine;
use crate::processing::{apply, DateRange, FilteredView, PredicateSet};
use crate::report::{self, Report};
use crate::store::RecordStore;

/// The current store plus the current [`PredicateSet`].
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<RecordStore>,
    predicates: PredicateSet,
}

impl Session {
    /// Start with every observed region and category selected and no date bound, so the
    /// first report covers the whole store.
    pub fn new(store: Arc<RecordStore>) -> Self {
        let predicates = PredicateSet::select_all(&store);
        Self { store, predicates }
    }

    /// Start from explicit selections.
    pub fn with_predicates(store: Arc<RecordStore>, predicates: PredicateSet) -> Self {
        Self { store, predicates }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    pub fn set_predicates(&mut self, predicates: PredicateSet) {
        self.predicates = predicates;
    }

    /// Replace the region selection. An empty selection filters out everything.
    pub fn select_regions<I, S>(&mut self, regions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicates.regions = regions.into_iter().map(Into::into).collect();
    }

    /// Replace the category selection. An empty selection filters out everything.
    pub fn select_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predicates.categories = categories.into_iter().map(Into::into).collect();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.predicates.date_range = Some(range);
    }

    /// Validate and set the date bounds.
    pub fn set_dates(&mut self, start: chrono::NaiveDate, end: chrono::NaiveDate) -> Result<(), PredicateError> {
        self.predicates.date_range = Some(DateRange::new(start, end)?);
        Ok(())
    }

    pub fn clear_date_range(&mut self) {
        self.predicates.date_range = None;
    }

    /// Back to the initial "everything selected" state.
    pub fn reset(&mut self) {
        self.predicates = PredicateSet::select_all(&self.store);
    }

    pub fn filtered(&self) -> FilteredView<'_> {
        apply(&self.store, &self.predicates)
    }

    pub fn report(&self) -> Report<'_> {
        report::run(&self.store, &self.predicates)
    }

    /// Same result as [`Session::report`], computed on `engine`'s thread pool.
    pub fn report_with(&self, engine: &ExecutionEngine) -> Report<'_> {
        engine.report(&self.store, &self.predicates)
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::store::RecordStore;
    use crate::types::Record;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn store() -> Arc<RecordStore> {
        let rec = |id: &str, region: &str, month: u32| {
            let day = NaiveDate::from_ymd_opt(2024, month, 1).unwrap();
            Record {
                order_id: id.to_string(),
                order_date: day,
                ship_date: day,
                region: region.to_string(),
                category: "Office".to_string(),
                sub_category: "Paper".to_string(),
                segment: "Consumer".to_string(),
                sales: Decimal::TEN,
                profit: Decimal::ONE,
            }
        };
        Arc::new(RecordStore::from_records(vec![
            rec("A", "East", 1),
            rec("B", "West", 2),
            rec("C", "East", 3),
        ]))
    }

    #[test]
    fn new_session_passes_everything_through() {
        let session = Session::new(store());
        assert_eq!(session.filtered().len(), 3);
    }

    #[test]
    fn selections_narrow_and_reset_restores() {
        let mut session = Session::new(store());
        session.select_regions(["East"]);
        assert_eq!(session.filtered().len(), 2);

        session
            .set_dates(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            )
            .unwrap();
        assert_eq!(session.report().kpi.distinct_orders, 1);

        session.select_categories(Vec::<String>::new());
        assert!(session.report().filtered.is_empty());

        session.reset();
        assert_eq!(session.filtered().len(), 3);
        assert!(session.predicates().date_range.is_none());
    }

    #[test]
    fn inverted_dates_leave_selection_unchanged() {
        let mut session = Session::new(store());
        let err = session.set_dates(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(err.is_err());
        assert!(session.predicates().date_range.is_none());
    }

    #[test]
    fn repeated_reports_are_identical() {
        let session = Session::new(store());
        assert_eq!(session.report(), session.report());
    }
}
