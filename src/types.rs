//! Core data model types.
//!
//! Ingestion turns string-keyed [`RawRow`]s into typed [`Record`]s. Grouping and
//! measure selection for aggregate views are described by [`GroupKey`] and [`Measure`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// Ingestion field names, in export order.
pub mod fields {
    pub const ORDER_ID: &str = "Order ID";
    pub const ORDER_DATE: &str = "Order Date";
    pub const SHIP_DATE: &str = "Ship Date";
    pub const REGION: &str = "Region";
    pub const CATEGORY: &str = "Category";
    pub const SUB_CATEGORY: &str = "Sub-Category";
    pub const SEGMENT: &str = "Segment";
    pub const SALES: &str = "Sales";
    pub const PROFIT: &str = "Profit";
    /// Derived from the order date; only produced on export.
    pub const MONTH: &str = "Month";

    /// Every field a raw row must carry.
    pub const REQUIRED: [&str; 9] = [
        ORDER_ID,
        ORDER_DATE,
        SHIP_DATE,
        REGION,
        CATEGORY,
        SUB_CATEGORY,
        SEGMENT,
        SALES,
        PROFIT,
    ];
}

/// One sales line item.
///
/// Several records may share an `order_id` (one per line item of the order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub order_id: String,
    pub order_date: NaiveDate,
    /// Not validated against `order_date`.
    pub ship_date: NaiveDate,
    pub region: String,
    pub category: String,
    pub sub_category: String,
    pub segment: String,
    /// Non-negative.
    pub sales: Decimal,
    pub profit: Decimal,
}

impl Record {
    /// Calendar month of the order date.
    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.order_date)
    }
}

/// A calendar month. Orders chronologically and displays as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The record field an aggregate view groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    Category,
    SubCategory,
    /// Order date truncated to its calendar month.
    Month,
    Region,
    Segment,
}

impl GroupKey {
    /// Column name of the grouping field.
    pub fn name(self) -> &'static str {
        match self {
            GroupKey::Category => fields::CATEGORY,
            GroupKey::SubCategory => fields::SUB_CATEGORY,
            GroupKey::Month => fields::MONTH,
            GroupKey::Region => fields::REGION,
            GroupKey::Segment => fields::SEGMENT,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A summable quantity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Measure {
    Sales,
    Profit,
    /// Number of records (line items); each record contributes one.
    LineItems,
}

impl Measure {
    /// The contribution of a single record to this measure.
    pub fn value_of(self, record: &Record) -> Decimal {
        match self {
            Measure::Sales => record.sales,
            Measure::Profit => record.profit,
            Measure::LineItems => Decimal::ONE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Measure::Sales => fields::SALES,
            Measure::Profit => fields::PROFIT,
            Measure::LineItems => "Line Items",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Calendar format of date fields. One format applies to a whole load; there is no
/// per-value guessing, so `03/04/2024` means different days under the two slash formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `YYYY-MM-DD`.
    #[default]
    Iso,
    /// `M/D/YYYY` (the Superstore export layout).
    MonthFirst,
    /// `D/M/YYYY`.
    DayFirst,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Iso => "%Y-%m-%d",
            DateFormat::MonthFirst => "%m/%d/%Y",
            DateFormat::DayFirst => "%d/%m/%Y",
        }
    }

    /// Human-readable layout, used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            DateFormat::Iso => "YYYY-MM-DD",
            DateFormat::MonthFirst => "M/D/YYYY",
            DateFormat::DayFirst => "D/M/YYYY",
        }
    }

    /// Parse a trimmed date string. Returns `None` if it does not match this format.
    pub fn parse(self, raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), self.pattern()).ok()
    }

    pub fn format(self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

/// One untyped input row: field name to raw string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    values: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Raw value for `field`, if present.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
