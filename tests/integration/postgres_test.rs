//! Export tests against a real PostgreSQL database.
//!
//! Skipped unless DATABASE_URL is set.

use calamine::{open_workbook_auto, Data, Reader};
use pg2xlsx::config::{ConnectionParams, ExportConfig, RunMode};
use pg2xlsx::db::{DatabaseClient, PostgresClient};
use pg2xlsx::export::{export_with_client, QuerySource};

/// Helper to create a test client.
async fn get_test_client() -> Option<PostgresClient> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let params = ConnectionParams::from_connection_string(&url).ok()?;
    PostgresClient::connect(&params).await.ok()
}

#[tokio::test]
async fn test_export_query() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("pg.xlsx");
    let sql = "SELECT code, price FROM (VALUES ('0042', 19.99::numeric), ('17', 5::numeric)) \
               AS t(code, price) ORDER BY code DESC";

    let config = ExportConfig {
        connection: ConnectionParams::default(),
        query_source: QuerySource::Command(sql.to_string()),
        mode: RunMode::Export {
            output: output.clone(),
        },
        titles: true,
        column_width: 10.0,
        author: None,
        no_password: true,
    };

    let summary = export_with_client(&config, &client, sql, &output)
        .await
        .unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.columns, 2);

    let mut workbook = open_workbook_auto(&output).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();

    assert_eq!(
        rows,
        vec![
            vec![Data::String("code".into()), Data::String("price".into())],
            vec![Data::Float(17.0), Data::Float(5.0)],
            vec![Data::String("0042".into()), Data::Float(19.99)],
        ]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_export_multi_statement_script() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("pg.xlsx");
    let sql = "SET search_path TO public; SELECT '0042'::text AS code";
    let config = ExportConfig {
        connection: ConnectionParams::default(),
        query_source: QuerySource::Command(sql.to_string()),
        mode: RunMode::Export {
            output: output.clone(),
        },
        titles: true,
        column_width: 10.0,
        author: None,
        no_password: true,
    };

    let summary = export_with_client(&config, &client, sql, &output)
        .await
        .unwrap();
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.columns, 1);

    let mut workbook = open_workbook_auto(&output).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    assert_eq!(
        rows,
        vec![
            vec![Data::String("code".into())],
            vec![Data::String("0042".into())],
        ]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_export_query_error() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("pg.xlsx");
    let sql = "SELECT * FROM nonexistent_table_xyz";
    let config = ExportConfig {
        connection: ConnectionParams::default(),
        query_source: QuerySource::Command(sql.to_string()),
        mode: RunMode::Export {
            output: output.clone(),
        },
        titles: false,
        column_width: 10.0,
        author: None,
        no_password: true,
    };

    let err = export_with_client(&config, &client, sql, &output)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "Query Error");
    assert!(!output.exists());

    client.close().await.unwrap();
}
