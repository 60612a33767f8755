//! The named result set produced for one filter application.
//!
//! A [`Report`] carries the filtered view (for previews and export), the seven named
//! aggregate views in a fixed order, and the KPI snapshot.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::processing::{aggregate, apply, summarize, AggregateRequest, AggregateView, FilteredView, KpiSnapshot, PredicateSet};
use crate::store::RecordStore;
use crate::types::{GroupKey, Measure};

/// The aggregate views every report carries, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportView {
    CategorySales,
    CategoryProfit,
    SubcategorySalesRanked,
    SubcategoryProfitRanked,
    MonthlySales,
    RegionProfit,
    SegmentSalesAndProfit,
}

impl ReportView {
    pub const ALL: [ReportView; 7] = [
        ReportView::CategorySales,
        ReportView::CategoryProfit,
        ReportView::SubcategorySalesRanked,
        ReportView::SubcategoryProfitRanked,
        ReportView::MonthlySales,
        ReportView::RegionProfit,
        ReportView::SegmentSalesAndProfit,
    ];

    /// Stable name used by presentation and export collaborators.
    pub fn name(self) -> &'static str {
        match self {
            ReportView::CategorySales => "category-sales",
            ReportView::CategoryProfit => "category-profit",
            ReportView::SubcategorySalesRanked => "subcategory-sales-ranked",
            ReportView::SubcategoryProfitRanked => "subcategory-profit-ranked",
            ReportView::MonthlySales => "monthly-sales",
            ReportView::RegionProfit => "region-profit",
            ReportView::SegmentSalesAndProfit => "segment-sales-and-profit",
        }
    }

    pub fn request(self) -> AggregateRequest {
        match self {
            ReportView::CategorySales => AggregateRequest::new(GroupKey::Category).measure(Measure::Sales),
            ReportView::CategoryProfit => AggregateRequest::new(GroupKey::Category).measure(Measure::Profit),
            ReportView::SubcategorySalesRanked => {
                AggregateRequest::new(GroupKey::SubCategory).ranked_by(Measure::Sales)
            }
            ReportView::SubcategoryProfitRanked => {
                AggregateRequest::new(GroupKey::SubCategory).ranked_by(Measure::Profit)
            }
            ReportView::MonthlySales => AggregateRequest::new(GroupKey::Month).measure(Measure::Sales),
            ReportView::RegionProfit => AggregateRequest::new(GroupKey::Region).measure(Measure::Profit),
            ReportView::SegmentSalesAndProfit => AggregateRequest::new(GroupKey::Segment)
                .measure(Measure::Sales)
                .measure(Measure::Profit),
        }
    }

    /// Compute this view over `view`.
    pub fn compute(self, view: &FilteredView<'_>) -> NamedView {
        NamedView {
            name: self,
            view: aggregate(view, &self.request()),
        }
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An aggregate view tagged with its report name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedView {
    pub name: ReportView,
    pub view: AggregateView,
}

/// Everything derived from one filter application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<'a> {
    pub filtered: FilteredView<'a>,
    pub views: Vec<NamedView>,
    pub kpi: KpiSnapshot,
}

impl<'a> Report<'a> {
    /// Derive every view and the KPI snapshot from `filtered`.
    pub fn build(filtered: FilteredView<'a>) -> Self {
        let views = ReportView::ALL.iter().map(|v| v.compute(&filtered)).collect();
        let kpi = summarize(&filtered);
        Self { filtered, views, kpi }
    }

    pub(crate) fn from_parts(filtered: FilteredView<'a>, views: Vec<NamedView>, kpi: KpiSnapshot) -> Self {
        Self { filtered, views, kpi }
    }

    /// The aggregate view named `name`.
    pub fn view(&self, name: ReportView) -> Option<&AggregateView> {
        self.views.iter().find(|v| v.name == name).map(|v| &v.view)
    }
}

/// Filter `store` by `predicates` and build the full report sequentially.
pub fn run<'a>(store: &'a RecordStore, predicates: &PredicateSet) -> Report<'a> {
    let report = Report::build(apply(store, predicates));
    debug!(
        records = report.filtered.len(),
        orders = report.kpi.distinct_orders,
        "report built"
    );
    report
}
