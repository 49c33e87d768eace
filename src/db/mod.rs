//! Database abstraction layer.
//!
//! Provides a trait-based interface for database operations so the executor
//! can run against PostgreSQL or an in-memory mock interchangeably.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Creates a PostgreSQL client for the given configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(
    config: &ConnectionConfig,
    query_timeout: Duration,
) -> Result<Box<dyn DatabaseClient>> {
    let client = PostgresClient::connect(config)
        .await?
        .with_query_timeout(query_timeout);
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with GatewayError.
/// Query failures carry the database's raw error text.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL query and returns the results.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Checks that the database is reachable.
    async fn ping(&self) -> Result<()>;

    /// Number of open connections held by the client.
    fn connection_count(&self) -> usize;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
