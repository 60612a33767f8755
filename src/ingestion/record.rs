//! Typed parsing of a single [`RawRow`] into a [`Record`].

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{fields, DateFormat, RawRow, Record};

/// Largest accepted magnitude for `Sales` and `Profit` (10^15).
///
/// Keeps any realistic number of summed records within `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Options controlling how raw values are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Format of `Order Date` and `Ship Date`.
    pub date_format: DateFormat,
}

impl LoadOptions {
    pub fn with_date_format(date_format: DateFormat) -> Self {
        Self { date_format }
    }
}

/// Parse one raw row. `row` is the 1-based row number reported in errors.
///
/// Text fields are trimmed; a field that is absent or blank is missing.
pub fn parse_record(row: usize, raw: &RawRow, options: &LoadOptions) -> IngestionResult<Record> {
    Ok(Record {
        order_id: required_text(row, raw, fields::ORDER_ID)?,
        order_date: required_date(row, raw, fields::ORDER_DATE, options.date_format)?,
        ship_date: required_date(row, raw, fields::SHIP_DATE, options.date_format)?,
        region: required_text(row, raw, fields::REGION)?,
        category: required_text(row, raw, fields::CATEGORY)?,
        sub_category: required_text(row, raw, fields::SUB_CATEGORY)?,
        segment: required_text(row, raw, fields::SEGMENT)?,
        sales: sales_amount(row, raw)?,
        profit: required_amount(row, raw, fields::PROFIT)?,
    })
}

fn required<'a>(row: usize, raw: &'a RawRow, field: &str) -> IngestionResult<&'a str> {
    match raw.get(field).map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(IngestionError::MissingField {
            row,
            field: field.to_owned(),
        }),
    }
}

fn required_text(row: usize, raw: &RawRow, field: &str) -> IngestionResult<String> {
    required(row, raw, field).map(str::to_owned)
}

fn required_date(
    row: usize,
    raw: &RawRow,
    field: &str,
    format: DateFormat,
) -> IngestionResult<NaiveDate> {
    let value = required(row, raw, field)?;
    format.parse(value).ok_or_else(|| IngestionError::MalformedDate {
        row,
        field: field.to_owned(),
        raw: value.to_owned(),
        expected: format.describe(),
    })
}

fn required_amount(row: usize, raw: &RawRow, field: &str) -> IngestionResult<Decimal> {
    let value = required(row, raw, field)?;
    parse_amount(value).map_err(|message| IngestionError::InvalidAmount {
        row,
        field: field.to_owned(),
        raw: value.to_owned(),
        message,
    })
}

fn sales_amount(row: usize, raw: &RawRow) -> IngestionResult<Decimal> {
    let sales = required_amount(row, raw, fields::SALES)?;
    if sales.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if sales.is_sign_negative() {
        return Err(IngestionError::InvalidAmount {
            row,
            field: fields::SALES.to_owned(),
            raw: sales.to_string(),
            message: "sales must not be negative".to_string(),
        });
    }
    Ok(sales)
}

/// Plain decimal (`-12.5`) or scientific notation (`1.25e1`), at most [`MAX_AMOUNT`] in magnitude.
fn parse_amount(s: &str) -> Result<Decimal, String> {
    let parsed = if s.contains(['e', 'E']) {
        Decimal::from_scientific(s)
    } else {
        Decimal::from_str(s)
    };
    let value = parsed.map_err(|e| e.to_string())?;
    if value.abs() > MAX_AMOUNT {
        return Err(format!("magnitude exceeds {MAX_AMOUNT}"));
    }
    Ok(value)
}
