//! Delimited-text export of a [`FilteredView`].
//!
//! Columns follow the ingestion field order, optionally followed by the derived `Month`.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ExportResult;
use crate::processing::FilteredView;
use crate::types::{fields, DateFormat, Record};

/// Options controlling CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Format used for `Order Date` and `Ship Date`.
    pub date_format: DateFormat,
    /// Append the derived `Month` column (`YYYY-MM`).
    pub include_month: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            date_format: DateFormat::Iso,
            include_month: true,
        }
    }
}

/// Write `view` as delimited text with a header row.
pub fn write_csv<W: io::Write>(view: &FilteredView<'_>, writer: W, options: &ExportOptions) -> ExportResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    let mut header: Vec<&str> = fields::REQUIRED.to_vec();
    if options.include_month {
        header.push(fields::MONTH);
    }
    wtr.write_record(&header)?;

    for record in view.iter() {
        wtr.write_record(&row(record, options))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `view` to a file at `path`, replacing it if it exists.
pub fn write_csv_to_path(view: &FilteredView<'_>, path: impl AsRef<Path>, options: &ExportOptions) -> ExportResult<()> {
    let file = File::create(path)?;
    write_csv(view, io::BufWriter::new(file), options)
}

/// Render `view` as an in-memory CSV string.
pub fn to_csv_string(view: &FilteredView<'_>, options: &ExportOptions) -> ExportResult<String> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf, options)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn row(record: &Record, options: &ExportOptions) -> Vec<String> {
    let mut out = vec![
        record.order_id.clone(),
        options.date_format.format(record.order_date),
        options.date_format.format(record.ship_date),
        record.region.clone(),
        record.category.clone(),
        record.sub_category.clone(),
        record.segment.clone(),
        record.sales.to_string(),
        record.profit.to_string(),
    ];
    if options.include_month {
        out.push(record.month().to_string());
    }
    out
}
