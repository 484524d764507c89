//! Mock database clients for testing.
//!
//! Provides in-memory implementations of `DatabaseClient` that return
//! predefined results or fail on every call.

use super::{ColumnInfo, DatabaseClient, RawRow};
use crate::error::{ExportError, Result};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};

/// A mock database client that returns a fixed result set for any query.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    columns: Vec<ColumnInfo>,
    rows: Vec<RawRow>,
    closed: AtomicBool,
}

impl MockDatabaseClient {
    /// Creates a mock client with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock client returning the given columns and rows.
    pub fn with_result(columns: Vec<ColumnInfo>, rows: Vec<RawRow>) -> Self {
        Self {
            columns,
            rows,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn describe(&self, _sql: &str) -> Result<Vec<ColumnInfo>> {
        Ok(self.columns.clone())
    }

    fn fetch_rows<'a>(&'a self, _sql: &'a str) -> BoxStream<'a, Result<RawRow>> {
        stream::iter(self.rows.iter().cloned().map(Ok)).boxed()
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// A database client whose queries always fail with the given message.
#[derive(Debug, Clone)]
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a failing client reporting `message` as the driver error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn describe(&self, _sql: &str) -> Result<Vec<ColumnInfo>> {
        Err(ExportError::query(self.message.clone()))
    }

    fn fetch_rows<'a>(&'a self, _sql: &'a str) -> BoxStream<'a, Result<RawRow>> {
        stream::once(async move { Err(ExportError::query(self.message.clone())) }).boxed()
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
