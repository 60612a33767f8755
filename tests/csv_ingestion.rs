use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sales_report::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader, ingest_csv_from_str};
use sales_report::ingestion::LoadOptions;
use sales_report::types::DateFormat;
use sales_report::IngestionError;

fn superstore_opts() -> LoadOptions {
    LoadOptions::with_date_format(DateFormat::MonthFirst)
}

#[test]
fn ingest_superstore_export_happy_path() {
    let store = ingest_csv_from_path("tests/fixtures/superstore_sample.csv", &superstore_opts()).unwrap();

    assert_eq!(store.len(), 16);
    let first = &store.records()[0];
    assert_eq!(first.order_id, "CA-2016-152156");
    assert_eq!(first.order_date, NaiveDate::from_ymd_opt(2016, 11, 8).unwrap());
    assert_eq!(first.ship_date, NaiveDate::from_ymd_opt(2016, 11, 11).unwrap());
    assert_eq!(first.sub_category, "Bookcases");
    assert_eq!(first.sales, dec!(261.96));
    assert_eq!(store.records()[3].profit, dec!(-383.031));

    assert_eq!(store.regions(), ["South", "West", "Central"]);
    assert_eq!(store.categories(), ["Furniture", "Office Supplies", "Technology"]);
    assert_eq!(store.segments(), ["Consumer", "Corporate", "Home Office"]);

    let bounds = store.date_bounds().unwrap();
    assert_eq!(bounds.start(), NaiveDate::from_ymd_opt(2014, 5, 13).unwrap());
    assert_eq!(bounds.end(), NaiveDate::from_ymd_opt(2017, 4, 15).unwrap());
}

#[test]
fn wrong_date_format_fails_on_first_data_row() {
    let err = ingest_csv_from_path("tests/fixtures/superstore_sample.csv", &LoadOptions::default()).unwrap_err();
    match err {
        IngestionError::MalformedDate { row, field, raw, .. } => {
            assert_eq!(row, 2);
            assert_eq!(field, "Order Date");
            assert_eq!(raw, "11/8/2016");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_amount_reports_physical_line() {
    let err = ingest_csv_from_path("tests/fixtures/bad_amount.csv", &LoadOptions::default()).unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, IngestionError::InvalidAmount { row: 3, .. }));
    assert!(msg.contains("field 'Sales'"));
    assert!(msg.contains("raw='ten'"));
}

#[test]
fn line_numbers_account_for_multiline_quoted_fields() {
    let input = "\
Order ID,Order Date,Ship Date,Region,Category,Sub-Category,Segment,Sales,Profit
A-1,2024-01-01,2024-01-02,East,Office,\"Paper
and more\",Consumer,10,1
A-2,2024-01-03,2024-01-04,East,Office,Paper,Consumer,ten,1
";
    let err = ingest_csv_from_str(input, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::InvalidAmount { row: 4, .. }), "{err}");
}

#[test]
fn amounts_beyond_the_magnitude_limit_fail_the_load() {
    let header = "Order ID,Order Date,Ship Date,Region,Category,Sub-Category,Segment,Sales,Profit\n";
    let sales = format!(
        "{header}A-1,2024-01-01,2024-01-02,East,Office,Paper,Consumer,7e28,1\n\
         A-2,2024-01-03,2024-01-04,East,Office,Paper,Consumer,7e28,1\n"
    );
    let err = ingest_csv_from_str(&sales, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::InvalidAmount { row: 2, ref field, .. } if field == "Sales"));

    let profit = format!("{header}A-1,2024-01-01,2024-01-02,East,Office,Paper,Consumer,1,-2e15\n");
    let err = ingest_csv_from_str(&profit, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::InvalidAmount { row: 2, ref field, .. } if field == "Profit"));
}

#[test]
fn negative_zero_sales_loads_as_zero() {
    let input = "\
Order ID,Order Date,Ship Date,Region,Category,Sub-Category,Segment,Sales,Profit
A-1,2024-01-01,2024-01-02,East,Office,Paper,Consumer,-0,1
";
    let store = ingest_csv_from_str(input, &LoadOptions::default()).unwrap();
    assert_eq!(store.records()[0].sales.to_string(), "0");
}

#[test]
fn ingest_csv_allows_reordered_columns() {
    let input = "Profit,Sales,Segment,Sub-Category,Category,Region,Ship Date,Order Date,Order ID\n\
                 -1.5,20,Consumer,Paper,Office,East,2024-01-03,2024-01-01,X-1\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let store = ingest_csv_from_reader(&mut rdr, &LoadOptions::default()).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.records()[0].order_id, "X-1");
    assert_eq!(store.records()[0].profit, dec!(-1.5));
}

#[test]
fn missing_header_column_is_missing_field_at_row_one() {
    let input = "Order ID,Order Date,Ship Date,Region,Category,Sub-Category,Sales,Profit\n";
    let err = ingest_csv_from_str(input, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::MissingField { row: 1, ref field } if field == "Segment"));
    assert!(err.to_string().contains("missing required field 'Segment'"));
}

#[test]
fn blank_cell_is_missing_field() {
    let input = "Order ID,Order Date,Ship Date,Region,Category,Sub-Category,Segment,Sales,Profit\n\
                 ,2024-01-01,2024-01-02,East,Office,Paper,Consumer,1,1\n";
    let err = ingest_csv_from_str(input, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::MissingField { row: 2, ref field } if field == "Order ID"));
}

#[test]
fn ragged_row_is_a_csv_error() {
    let input = "Order ID,Order Date,Ship Date,Region,Category,Sub-Category,Segment,Sales,Profit\n\
                 A,2024-01-01,2024-01-02,East\n";
    let err = ingest_csv_from_str(input, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, IngestionError::Csv(_)));
}

#[test]
fn latin1_bytes_are_decoded() {
    let store = ingest_csv_from_path("tests/fixtures/latin1.csv", &LoadOptions::default()).unwrap();
    assert_eq!(store.regions(), ["Québec"]);
}

#[test]
fn header_only_input_loads_an_empty_store() {
    let input = "Order ID,Order Date,Ship Date,Region,Category,Sub-Category,Segment,Sales,Profit\n";
    let store = ingest_csv_from_str(input, &LoadOptions::default()).unwrap();
    assert!(store.is_empty());
    assert!(store.date_bounds().is_none());
}
