//! Grouped aggregation over a [`FilteredView`].
//!
//! Only groups that occur in the view appear in the result; a key with no matching
//! records is omitted rather than reported as zero.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AggregationError, AggregationResult};
use crate::processing::FilteredView;
use crate::types::{GroupKey, Measure, Record, YearMonth};

/// Result ordering of an aggregate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupOrder {
    /// Ascending by key; chronological for [`GroupKey::Month`].
    ByKey,
    /// Descending by the given measure, ties broken by ascending key.
    Ranked(Measure),
}

/// What to aggregate and how to order it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub group_by: GroupKey,
    /// Summed per group. Duplicates are ignored.
    pub measures: Vec<Measure>,
    pub order: GroupOrder,
}

impl AggregateRequest {
    pub fn new(group_by: GroupKey) -> Self {
        Self {
            group_by,
            measures: Vec::new(),
            order: GroupOrder::ByKey,
        }
    }

    pub fn measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    /// Rank groups by `measure` (which is also summed).
    pub fn ranked_by(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self.order = GroupOrder::Ranked(measure);
        self
    }
}

/// What to do when asked to aggregate an empty view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyViewPolicy {
    /// Return a view with no groups.
    #[default]
    EmptyResult,
    /// Fail with [`AggregationError::EmptyView`].
    Fail,
}

/// One group of an [`AggregateView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub key: String,
    pub totals: BTreeMap<Measure, Decimal>,
}

impl Group {
    /// Summed `measure`, or `None` if it was not requested.
    pub fn get(&self, measure: Measure) -> Option<Decimal> {
        self.totals.get(&measure).copied()
    }
}

/// Grouped-and-summed projection of a filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateView {
    pub group_by: GroupKey,
    pub measures: Vec<Measure>,
    pub groups: Vec<Group>,
}

impl AggregateView {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    pub fn group(&self, key: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.key == key)
    }

    /// Shorthand for `group(key)?.get(measure)`.
    pub fn value(&self, key: &str, measure: Measure) -> Option<Decimal> {
        self.group(key)?.get(measure)
    }

    /// Sum of `measure` across all groups, or `None` if it was not requested.
    pub fn total(&self, measure: Measure) -> Option<Decimal> {
        if !self.measures.contains(&measure) {
            return None;
        }
        Some(
            self.groups
                .iter()
                .filter_map(|g| g.get(measure))
                .fold(Decimal::ZERO, Decimal::saturating_add),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Label<'a> {
    Text(&'a str),
    Month(YearMonth),
}

impl Label<'_> {
    fn of(group_by: GroupKey, record: &Record) -> Label<'_> {
        match group_by {
            GroupKey::Category => Label::Text(&record.category),
            GroupKey::SubCategory => Label::Text(&record.sub_category),
            GroupKey::Region => Label::Text(&record.region),
            GroupKey::Segment => Label::Text(&record.segment),
            GroupKey::Month => Label::Month(record.month()),
        }
    }

    fn into_key(self) -> String {
        match self {
            Label::Text(s) => s.to_owned(),
            Label::Month(m) => m.to_string(),
        }
    }
}

/// Group `view` by `request.group_by` and sum the requested measures.
///
/// An empty view produces an empty result. See [`try_aggregate`] for the failing variant.
pub fn aggregate(view: &FilteredView<'_>, request: &AggregateRequest) -> AggregateView {
    let mut measures = request.measures.clone();
    measures.sort();
    measures.dedup();

    let mut acc: BTreeMap<Label<'_>, Vec<Decimal>> = BTreeMap::new();
    for record in view.iter() {
        let sums = acc
            .entry(Label::of(request.group_by, record))
            .or_insert_with(|| vec![Decimal::ZERO; measures.len()]);
        for (sum, m) in sums.iter_mut().zip(&measures) {
            *sum = sum.saturating_add(m.value_of(record));
        }
    }

    let mut groups: Vec<Group> = acc
        .into_iter()
        .map(|(label, sums)| Group {
            key: label.into_key(),
            totals: measures.iter().copied().zip(sums).collect(),
        })
        .collect();

    if let GroupOrder::Ranked(by) = request.order {
        groups.sort_by(|a, b| b.get(by).cmp(&a.get(by)).then_with(|| a.key.cmp(&b.key)));
    }

    AggregateView {
        group_by: request.group_by,
        measures,
        groups,
    }
}

/// Like [`aggregate`], but honours `policy` for an empty view.
pub fn try_aggregate(
    view: &FilteredView<'_>,
    request: &AggregateRequest,
    policy: EmptyViewPolicy,
) -> AggregationResult<AggregateView> {
    if view.is_empty() && policy == EmptyViewPolicy::Fail {
        return Err(AggregationError::EmptyView {
            group_by: request.group_by,
        });
    }
    Ok(aggregate(view, request))
}
