//! End-to-end export tests.
//!
//! Runs the export against a mock client and reads the written workbook back.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{TimeZone, Utc};
use pg2xlsx::config::{ConnectionParams, ExportConfig, RunMode};
use pg2xlsx::db::{ColumnInfo, MockDatabaseClient, RawValue};
use pg2xlsx::export::{export_with_client, QuerySource};
use std::path::Path;

fn export_config(output: &Path, titles: bool) -> ExportConfig {
    ExportConfig {
        connection: ConnectionParams::default(),
        query_source: QuerySource::Command("SELECT".to_string()),
        mode: RunMode::Export {
            output: output.to_path_buf(),
        },
        titles,
        column_width: 10.0,
        author: Some("integration".to_string()),
        no_password: true,
    }
}

fn read_rows(path: &Path) -> Vec<Vec<Data>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

async fn export(
    columns: Vec<ColumnInfo>,
    rows: Vec<Vec<RawValue>>,
    titles: bool,
) -> (tempfile::TempDir, Vec<Vec<Data>>, usize) {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("export.xlsx");
    let config = export_config(&output, titles);
    let client = MockDatabaseClient::with_result(columns, rows);

    let summary = export_with_client(&config, &client, "SELECT", &output)
        .await
        .unwrap();

    let rows = read_rows(&output);
    (dir, rows, summary.rows)
}

/// Scenario: zero-padded code
/// Given a query returning column `code` with value "0042"
/// Then the sheet holds one string cell "0042"
#[tokio::test]
async fn test_leading_zero_code_is_string() {
    let (_dir, rows, count) = export(
        vec![ColumnInfo::new("code", "TEXT")],
        vec![vec![RawValue::from("0042")]],
        false,
    )
    .await;

    assert_eq!(count, 1);
    assert_eq!(rows, vec![vec![Data::String("0042".to_string())]]);
}

/// Scenario: decimal price
/// Given a query returning column `price` with value "19.99"
/// Then the sheet holds one number cell 19.99
#[tokio::test]
async fn test_decimal_price_is_number() {
    let (_dir, rows, _) = export(
        vec![ColumnInfo::new("price", "NUMERIC")],
        vec![vec![RawValue::from("19.99")]],
        false,
    )
    .await;

    assert_eq!(rows, vec![vec![Data::Float(19.99)]]);
}

/// Scenario: empty result
/// Given a query returning zero rows
/// Then the sheet has no data rows, and only the title row when requested
#[tokio::test]
async fn test_empty_result() {
    let columns = vec![ColumnInfo::new("id", "INT4"), ColumnInfo::new("name", "TEXT")];

    let (_dir, rows, count) = export(columns.clone(), vec![], false).await;
    assert_eq!(count, 0);
    assert!(rows.is_empty());

    let (_dir, rows, count) = export(columns, vec![], true).await;
    assert_eq!(count, 0);
    assert_eq!(
        rows,
        vec![vec![
            Data::String("id".to_string()),
            Data::String("name".to_string())
        ]]
    );
}

/// Scenario: title row and row order
/// Given three rows and titles enabled
/// Then row 0 holds the column names and the data rows keep their order
#[tokio::test]
async fn test_titles_and_row_order() {
    let (_dir, rows, count) = export(
        vec![ColumnInfo::new("n", "INT8"), ColumnInfo::new("flag", "BOOL")],
        vec![
            vec![RawValue::Int(3), RawValue::Bool(true)],
            vec![RawValue::Int(1), RawValue::Bool(false)],
            vec![RawValue::Int(2), RawValue::Bool(true)],
        ],
        true,
    )
    .await;

    assert_eq!(count, 3);
    assert_eq!(
        rows,
        vec![
            vec![Data::String("n".into()), Data::String("flag".into())],
            vec![Data::Float(3.0), Data::String("Y".into())],
            vec![Data::Float(1.0), Data::String("N".into())],
            vec![Data::Float(2.0), Data::String("Y".into())],
        ]
    );
}

/// Scenario: mixed value types
/// Given nulls, floats and timestamps
/// Then nulls are blank, floats are numbers and timestamps are datetimes
#[tokio::test]
async fn test_mixed_types() {
    let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let (_dir, rows, _) = export(
        vec![
            ColumnInfo::new("label", "TEXT"),
            ColumnInfo::new("missing", "TEXT"),
            ColumnInfo::new("ratio", "FLOAT8"),
            ColumnInfo::new("seen", "TIMESTAMPTZ"),
        ],
        vec![vec![
            RawValue::from("widget"),
            RawValue::Null,
            RawValue::Float(0.25),
            RawValue::from(ts),
        ]],
        false,
    )
    .await;

    let row = &rows[0];
    assert_eq!(row[0], Data::String("widget".to_string()));
    assert_eq!(row[1], Data::Empty);
    assert_eq!(row[2], Data::Float(0.25));
    assert!(matches!(row[3], Data::DateTime(_)), "got {:?}", row[3]);
}
