//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"Order ID": "A", ...}, ...]`
//! - A single object
//! - Newline-delimited JSON (NDJSON): one object per line
//!
//! Values may be strings or numbers; `null` counts as a missing field. Any other value in
//! `Sales` or `Profit` is an invalid amount.

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::store::RecordStore;
use crate::types::{fields, RawRow};

use super::record::LoadOptions;

/// Ingest a JSON file into a [`RecordStore`].
pub fn ingest_json_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> IngestionResult<RecordStore> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text, options)
}

/// Ingest JSON from an in-memory string into a [`RecordStore`].
pub fn ingest_json_from_str(input: &str, options: &LoadOptions) -> IngestionResult<RecordStore> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::Unsupported {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    let values = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(v @ serde_json::Value::Object(_)) => vec![v],
        Ok(_) => {
            return Err(IngestionError::Unsupported {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            });
        }
        Err(_) => parse_ndjson(trimmed)?,
    };

    let rows = values
        .iter()
        .enumerate()
        .map(|(idx0, v)| raw_row(idx0 + 1, v))
        .collect::<IngestionResult<Vec<_>>>()?;
    RecordStore::load(rows, options)
}

fn parse_ndjson(input: &str) -> IngestionResult<Vec<serde_json::Value>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(IngestionError::from))
        .collect()
}

fn raw_row(row: usize, v: &serde_json::Value) -> IngestionResult<RawRow> {
    let obj = v.as_object().ok_or_else(|| IngestionError::Unsupported {
        message: format!("row {row} is not a json object"),
    })?;

    let mut raw = RawRow::new();
    for field in fields::REQUIRED {
        match obj.get(field) {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::String(s)) => raw.insert(field, s.as_str()),
            Some(serde_json::Value::Number(n)) => raw.insert(field, n.to_string()),
            Some(other) if field == fields::SALES || field == fields::PROFIT => {
                return Err(IngestionError::InvalidAmount {
                    row,
                    field: field.to_owned(),
                    raw: other.to_string(),
                    message: "expected a number or numeric string".to_string(),
                });
            }
            Some(other) => {
                return Err(IngestionError::Unsupported {
                    message: format!("row {row} field '{field}' must be a string or number, got {other}"),
                });
            }
        }
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::ingest_json_from_str;
    use crate::error::IngestionError;
    use crate::ingestion::LoadOptions;
    use rust_decimal_macros::dec;

    const ROW: &str = r#"{"Order ID":"A","Order Date":"2024-01-02","Ship Date":"2024-01-04","Region":"East","Category":"Office","Sub-Category":"Paper","Segment":"Consumer","Sales":12.5,"Profit":"-1"}"#;

    #[test]
    fn accepts_numbers_and_strings() {
        let store = ingest_json_from_str(&format!("[{ROW}]"), &LoadOptions::default()).unwrap();
        assert_eq!(store.records()[0].sales, dec!(12.5));
        assert_eq!(store.records()[0].profit, dec!(-1));
    }

    #[test]
    fn accepts_ndjson() {
        let store = ingest_json_from_str(&format!("{ROW}\n\n{ROW}\n"), &LoadOptions::default()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn null_is_missing() {
        let input = ROW.replace(r#""Segment":"Consumer""#, r#""Segment":null"#);
        let err = ingest_json_from_str(&input, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, IngestionError::MissingField { row: 1, ref field } if field == "Segment"));
    }

    #[test]
    fn non_numeric_amount_values_are_invalid_amounts() {
        for (from, to, field) in [
            (r#""Sales":12.5"#, r#""Sales":true"#, "Sales"),
            (r#""Profit":"-1""#, r#""Profit":[1]"#, "Profit"),
            (r#""Sales":12.5"#, r#""Sales":{"value":12.5}"#, "Sales"),
        ] {
            let input = format!("[{ROW},{}]", ROW.replace(from, to));
            match ingest_json_from_str(&input, &LoadOptions::default()).unwrap_err() {
                IngestionError::InvalidAmount { row, field: f, .. } => {
                    assert_eq!(row, 2);
                    assert_eq!(f, field);
                }
                other => panic!("unexpected error for {to}: {other}"),
            }
        }
    }

    #[test]
    fn rejects_nested_values_and_scalars() {
        let input = ROW.replace(r#""Region":"East""#, r#""Region":{"name":"East"}"#);
        assert!(matches!(
            ingest_json_from_str(&input, &LoadOptions::default()),
            Err(IngestionError::Unsupported { .. })
        ));
        assert!(matches!(
            ingest_json_from_str("42", &LoadOptions::default()),
            Err(IngestionError::Unsupported { .. })
        ));
        assert!(matches!(
            ingest_json_from_str("   ", &LoadOptions::default()),
            Err(IngestionError::Unsupported { .. })
        ));
    }
}
