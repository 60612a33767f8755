//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::store::RecordStore;
use crate::types::{fields, RawRow};

use super::record::{parse_record, LoadOptions};

/// Ingest a CSV file into a [`RecordStore`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain every ingestion field (order can differ, extra columns are ignored).
/// - Fields that are not valid UTF-8 are decoded as Latin-1.
/// - Errors report the physical line a record starts on (the header is line 1).
pub fn ingest_csv_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> IngestionResult<RecordStore> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, options)
}

/// Ingest CSV held in memory.
pub fn ingest_csv_from_str(input: &str, options: &LoadOptions) -> IngestionResult<RecordStore> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());
    ingest_csv_from_reader(&mut rdr, options)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    options: &LoadOptions,
) -> IngestionResult<RecordStore> {
    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| decode_field(h).trim_start_matches('\u{feff}').trim().to_owned())
        .collect();

    // Map ingestion fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(fields::REQUIRED.len());
    for field in fields::REQUIRED {
        match headers.iter().position(|h| h == field) {
            Some(idx) => col_idxs.push((field, idx)),
            None => {
                return Err(IngestionError::MissingField {
                    row: 1,
                    field: field.to_owned(),
                });
            }
        }
    }

    let mut records = Vec::new();
    for (row_idx0, result) in rdr.byte_records().enumerate() {
        let record = result?;
        // Line where the record starts; quoted fields may span lines.
        let user_row = record
            .position()
            .map_or(row_idx0 + 2, |p| p.line() as usize);

        let raw: RawRow = col_idxs
            .iter()
            .filter_map(|&(field, idx)| record.get(idx).map(|v| (field, decode_field(v))))
            .collect();
        records.push(parse_record(user_row, &raw, options)?);
    }

    Ok(RecordStore::from_records(records))
}

fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        // Latin-1 maps each byte to the code point of the same value.
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::decode_field;

    #[test]
    fn decode_falls_back_to_latin1() {
        assert_eq!(decode_field("Québec".as_bytes()), "Québec");
        assert_eq!(decode_field(b"Qu\xe9bec"), "Québec");
    }
}
