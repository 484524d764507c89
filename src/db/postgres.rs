//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient` trait
//! for PostgreSQL databases using sqlx. Queries run over the simple query
//! protocol, so values arrive in text form and anything without a dedicated
//! `RawValue` variant is handed on as its text bytes.

use crate::config::ConnectionParams;
use crate::db::{ColumnInfo, DatabaseClient, RawRow, RawValue};
use crate::error::{ExportError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use futures::stream::{BoxStream, StreamExt};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, Statement, TypeInfo, ValueRef};
use std::borrow::Cow;
use std::time::Duration;
use tracing::debug;

/// Seconds to wait for the server to accept a connection.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL database client.
#[derive(Debug)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Creates a new PostgresClient from an existing connection pool.
    ///
    /// This is primarily useful for testing.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection with the given parameters.
    pub async fn connect(params: &ConnectionParams) -> Result<Self> {
        let options = connect_options(params)?;
        debug!("Connecting to {}", params.display_string());

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .connect_with(options)
            .await
            .map_err(|e| map_connection_error(e, params))?;

        debug!("Successfully connected to database");
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn describe(&self, sql: &str) -> Result<Vec<ColumnInfo>> {
        // The server refuses to prepare more than one command at a time.
        let sql = result_statement(sql);
        let statement = (&self.pool)
            .prepare(&sql)
            .await
            .map_err(|e| ExportError::query(format_query_error(e)))?;

        Ok(statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect())
    }

    fn fetch_rows<'a>(&'a self, sql: &'a str) -> BoxStream<'a, Result<RawRow>> {
        sqlx::raw_sql(sql)
            .fetch(&self.pool)
            .map(|row| {
                row.map(|row| convert_row(&row))
                    .map_err(|e| ExportError::query(format_query_error(e)))
            })
            .boxed()
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Returns the statement of a script whose result gets exported: the last one.
///
/// Text that does not parse is returned unchanged and left to the server.
fn result_statement(sql: &str) -> Cow<'_, str> {
    match Parser::parse_sql(&PostgreSqlDialect {}, sql) {
        Ok(statements) if statements.len() > 1 => match statements.last() {
            Some(last) => Cow::Owned(last.to_string()),
            None => Cow::Borrowed(sql),
        },
        _ => Cow::Borrowed(sql),
    }
}

/// Builds sqlx connect options; PG* environment variables fill unset fields.
fn connect_options(params: &ConnectionParams) -> Result<PgConnectOptions> {
    let mut options = PgConnectOptions::new().ssl_mode(params.ssl_mode);

    if let Some(host) = &params.host {
        options = options.host(host);
    }
    if let Some(port) = &params.port {
        let port: u16 = port.parse().map_err(|_| {
            ExportError::connection(format!("Invalid port '{port}': expected a number"))
        })?;
        options = options.port(port);
    }
    if let Some(user) = &params.user {
        options = options.username(user);
    }
    if let Some(password) = &params.password {
        options = options.password(password);
    }
    if let Some(dbname) = &params.dbname {
        options = options.database(dbname);
    }

    Ok(options)
}

/// Converts a sqlx PgRow to a row of raw values.
fn convert_row(row: &PgRow) -> RawRow {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a PgRow to a raw value.
fn convert_value(row: &PgRow, index: usize, type_name: &str) -> RawValue {
    let decoded: std::result::Result<Option<RawValue>, sqlx::Error> =
        match type_name.to_uppercase().as_str() {
            "BOOL" | "BOOLEAN" => row
                .try_get::<Option<bool>, _>(index)
                .map(|v| v.map(RawValue::Bool)),

            "INT2" | "SMALLINT" => row
                .try_get::<Option<i16>, _>(index)
                .map(|v| v.map(|v| RawValue::Int(v as i64))),

            "INT4" | "INT" | "INTEGER" => row
                .try_get::<Option<i32>, _>(index)
                .map(|v| v.map(|v| RawValue::Int(v as i64))),

            "INT8" | "BIGINT" => row
                .try_get::<Option<i64>, _>(index)
                .map(|v| v.map(RawValue::Int)),

            "FLOAT4" | "REAL" => row
                .try_get::<Option<f32>, _>(index)
                .map(|v| v.map(|v| RawValue::Float(v as f64))),

            "FLOAT8" | "DOUBLE PRECISION" => row
                .try_get::<Option<f64>, _>(index)
                .map(|v| v.map(RawValue::Float)),

            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(index)
                .map(|v| v.map(RawValue::from)),

            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(index)
                .map(|v| v.map(RawValue::from)),

            "DATE" => row
                .try_get::<Option<NaiveDate>, _>(index)
                .map(|v| v.map(RawValue::from)),

            "TIME" => row
                .try_get::<Option<NaiveTime>, _>(index)
                .map(|v| v.map(|t| RawValue::Other(t.to_string()))),

            "BYTEA" => row
                .try_get::<Option<Vec<u8>>, _>(index)
                .map(|v| v.map(RawValue::Bytes)),

            // NUMERIC, character types and everything else stay text
            _ => Ok(Some(raw_text(row, index))),
        };

    match decoded {
        Ok(value) => value.unwrap_or(RawValue::Null),
        Err(e) => {
            debug!("Falling back to text for {type_name} column {index}: {e}");
            raw_text(row, index)
        }
    }
}

/// Returns the value's bytes exactly as the server sent them.
fn raw_text(row: &PgRow, index: usize) -> RawValue {
    match row.try_get_raw(index) {
        Ok(value) if value.is_null() => RawValue::Null,
        Ok(value) => match value.as_bytes() {
            Ok(bytes) => RawValue::Bytes(bytes.to_vec()),
            Err(e) => RawValue::Other(e.to_string()),
        },
        Err(e) => RawValue::Other(e.to_string()),
    }
}

/// Maps sqlx connection errors to user-friendly messages, keeping the driver text.
fn map_connection_error(error: sqlx::Error, params: &ConnectionParams) -> ExportError {
    let host = params.host.as_deref().unwrap_or("localhost");
    let port = params.port.as_deref().unwrap_or("5432");
    let user = params.user.as_deref().unwrap_or("unknown");
    let database = params.dbname.as_deref().unwrap_or("unknown");

    let error_str = error.to_string();
    let lowered = error_str.to_lowercase();

    let summary = if lowered.contains("connection refused") || lowered.contains("could not connect")
    {
        format!("Cannot connect to {host}:{port}. Check that the server is running.")
    } else if lowered.contains("password authentication failed")
        || lowered.contains("authentication failed")
    {
        format!("Authentication failed for user '{user}'. Check your credentials.")
    } else if lowered.contains("does not exist") && lowered.contains("database") {
        format!("Database '{database}' does not exist.")
    } else if lowered.contains("timed out") || lowered.contains("timeout") {
        format!(
            "Connection to {host}:{port} timed out. The server may be overloaded or unreachable."
        )
    } else {
        return ExportError::connection(format!("unable to connect to postgres. {error_str}"));
    };

    ExportError::connection(format!("{summary} ({error_str})"))
}

/// Formats a query error with hints if available.
fn format_query_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };

    // PostgreSQL errors often carry "ERROR: message\nDETAIL: ...\nHINT: ..."
    let mut result = String::from("ERROR: ");
    result.push_str(db_error.message());

    if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
        if let Some(detail) = pg_error.detail() {
            result.push_str("\n  DETAIL: ");
            result.push_str(detail);
        }

        if let Some(hint) = pg_error.hint() {
            result.push_str("\n  HINT: ");
            result.push_str(hint);
        }

        if let Some(table) = pg_error.table() {
            result.push_str("\n  TABLE: ");
            result.push_str(table);
        }

        if let Some(column) = pg_error.column() {
            result.push_str("\n  COLUMN: ");
            result.push_str(column);
        }
    }

    result
}
