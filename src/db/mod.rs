//! Database abstraction layer for pg2xlsx.
//!
//! Provides a trait-based interface over the SQL engine so the export
//! pipeline can run against PostgreSQL or an in-memory mock.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use types::{ColumnInfo, RawRow, RawValue};

use crate::config::ConnectionParams;
use crate::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Creates a database client for the given connection parameters.
///
/// This is the central factory function for database connections.
pub async fn connect(params: &ConnectionParams) -> Result<Box<dyn DatabaseClient>> {
    let client = PostgresClient::connect(params).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
///
/// All database operations return Results with ExportError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Returns the column schema of a query without fetching its rows.
    ///
    /// Must succeed for queries that produce zero rows.
    async fn describe(&self, sql: &str) -> Result<Vec<ColumnInfo>>;

    /// Executes a query and streams its rows in result order.
    fn fetch_rows<'a>(&'a self, sql: &'a str) -> BoxStream<'a, Result<RawRow>>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
