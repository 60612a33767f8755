//! Scalar summary metrics over a [`FilteredView`].

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::processing::FilteredView;

/// Summary totals of a filtered view. All zero for an empty view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KpiSnapshot {
    pub total_sales: Decimal,
    pub total_profit: Decimal,
    /// Number of unique order identifiers.
    pub distinct_orders: usize,
    /// Number of records (line items).
    pub line_items: usize,
}

/// Summarize `view`. Never fails.
pub fn summarize(view: &FilteredView<'_>) -> KpiSnapshot {
    let mut orders = HashSet::new();
    let mut snapshot = KpiSnapshot {
        line_items: view.len(),
        ..KpiSnapshot::default()
    };
    for record in view.iter() {
        // Ingested amounts are bounded; saturate for hand-built stores.
        snapshot.total_sales = snapshot.total_sales.saturating_add(record.sales);
        snapshot.total_profit = snapshot.total_profit.saturating_add(record.profit);
        orders.insert(record.order_id.as_str());
    }
    snapshot.distinct_orders = orders.len();
    snapshot
}
