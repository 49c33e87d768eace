//! Query execution against a live PostgreSQL database.
//!
//! Skipped unless DATABASE_URL is set.

use std::sync::Arc;

use db_gateway::config::ConnectionConfig;
use db_gateway::db::{DatabaseClient, PostgresClient, Value};
use db_gateway::models::OutputFormat;
use db_gateway::query::QueryExecutor;

/// Helper to create a test client.
async fn get_test_client() -> Option<PostgresClient> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    PostgresClient::connect(&config).await.ok()
}

#[tokio::test]
async fn test_execute_select_with_null() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let result = client
        .execute_query("SELECT NULL::text as empty, 2.5::float8 as ratio, true as flag")
        .await
        .unwrap();

    assert_eq!(result.rows[0][0], Value::Null);
    assert_eq!(result.rows[0][1], Value::Float(2.5));
    assert_eq!(result.rows[0][2], Value::Bool(true));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_executor_limits_rows() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let executor = QueryExecutor::new(Arc::new(client));
    let response = executor
        .execute(
            "SELECT g FROM generate_series(1, 50) AS g",
            Some(10),
            OutputFormat::Table,
        )
        .await;

    assert!(response.success);
    assert_eq!(response.row_count, Some(10));
}

#[tokio::test]
async fn test_executor_enhances_missing_relation() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let executor = QueryExecutor::new(Arc::new(client));
    let response = executor
        .execute(
            "SELECT * FROM nonexistent_table_xyz",
            Some(10),
            OutputFormat::Table,
        )
        .await;

    assert!(!response.success);
    let error = response.error.unwrap();
    assert!(error.contains("does not exist"));
    assert!(error.contains("Hint: The object you're referencing doesn't exist."));
    assert!(error.ends_with("Query: SELECT * FROM nonexistent_table_xyz"));
}
