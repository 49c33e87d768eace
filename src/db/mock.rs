//! Mock database clients for testing.
//!
//! `MockDatabaseClient` answers every query from memory; `FailingDatabaseClient`
//! fails a fixed number of times before delegating to the mock.

use super::{ColumnInfo, DatabaseClient, QueryResult, Value};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A mock database client that returns predefined results.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    tables: Vec<String>,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose `SHOW TABLES` lists the given names.
    pub fn with_tables<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let sql_upper = sql.trim().to_uppercase();

        let result = if sql_upper.starts_with("SHOW") {
            let rows = self
                .tables
                .iter()
                .map(|name| vec![Value::from(name.as_str())])
                .collect();
            QueryResult::with_data(vec![ColumnInfo::new("name", "text")], rows)
        } else {
            QueryResult::with_data(
                vec![ColumnInfo::new("result", "text")],
                vec![vec![Value::String(format!("Mock result for: {sql}"))]],
            )
        };

        Ok(result.with_execution_time(Duration::from_millis(1)))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn connection_count(&self) -> usize {
        1
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A client whose first `failures` queries fail with a fixed message.
#[derive(Debug)]
pub struct FailingDatabaseClient {
    message: String,
    failures: usize,
    calls: AtomicUsize,
    inner: MockDatabaseClient,
}

impl FailingDatabaseClient {
    /// Fails every query with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self::failing_times(message, usize::MAX)
    }

    /// Fails the first `failures` queries with `message`, then succeeds.
    pub fn failing_times(message: impl Into<String>, failures: usize) -> Self {
        Self {
            message: message.into(),
            failures,
            calls: AtomicUsize::new(0),
            inner: MockDatabaseClient::new(),
        }
    }

    /// Number of queries received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(GatewayError::query(self.message.clone()));
        }
        self.inner.execute_query(sql).await
    }

    async fn ping(&self) -> Result<()> {
        Err(GatewayError::connection(self.message.clone()))
    }

    fn connection_count(&self) -> usize {
        0
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
