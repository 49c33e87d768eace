//! End-to-end HTTP tests against the mock database.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use db_gateway::db::{FailingDatabaseClient, MockDatabaseClient};
use db_gateway::models::QueryResponse;
use db_gateway::query::QueryExecutor;
use db_gateway::server::{create_router, AppState};
use tower::ServiceExt;

async fn post_query(state: AppState, body: serde_json::Value) -> QueryResponse {
    let response = create_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/query")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_show_tables_through_gateway() {
    let state = AppState::new(QueryExecutor::new(Arc::new(
        MockDatabaseClient::with_tables(["orders", "users"]),
    )));

    let response = post_query(
        state,
        serde_json::json!({ "sql": "SHOW TABLES", "format": "json" }),
    )
    .await;

    assert!(response.success);
    assert_eq!(response.row_count, Some(2));
    assert_eq!(response.columns, Some(vec!["name".to_string()]));
    let formatted: serde_json::Value =
        serde_json::from_str(response.formatted.as_deref().unwrap()).unwrap();
    assert_eq!(formatted[1]["name"], "users");
}

#[tokio::test]
async fn test_null_limit_leaves_statement_alone() {
    let state = AppState::new(QueryExecutor::new(Arc::new(MockDatabaseClient::new())));

    let response = post_query(
        state,
        serde_json::json!({ "sql": "SELECT 1", "limit": null, "format": "csv" }),
    )
    .await;

    assert_eq!(
        response.formatted.as_deref(),
        Some("result\nMock result for: SELECT 1")
    );
}

#[tokio::test]
async fn test_write_is_rejected_without_hint() {
    let state = AppState::new(QueryExecutor::new(Arc::new(MockDatabaseClient::new())));

    let response = post_query(state, serde_json::json!({ "sql": "drop table users" })).await;

    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Only read-only queries allowed: DROP")
    );
    assert!(response.execution_time.is_none());
}

#[tokio::test]
async fn test_expired_session_recovers_after_retry() {
    let db = Arc::new(FailingDatabaseClient::failing_times(
        "Authentication token has expired",
        1,
    ));
    let executor = QueryExecutor::new(db.clone()).with_retry_policy(1, Duration::from_millis(1));

    let response = post_query(
        AppState::new(executor),
        serde_json::json!({ "sql": "SELECT * FROM orders" }),
    )
    .await;

    assert!(response.success);
    assert_eq!(db.calls(), 2);
}

#[tokio::test]
async fn test_failure_carries_enhanced_error() {
    let db = Arc::new(FailingDatabaseClient::new(
        "SQL compilation error: invalid identifier 'EMAL'",
    ));
    let executor = QueryExecutor::new(db).with_retry_policy(3, Duration::ZERO);

    let response = post_query(
        AppState::new(executor),
        serde_json::json!({ "sql": "SELECT emal FROM users" }),
    )
    .await;

    assert!(!response.success);
    let error = response.error.unwrap();
    assert!(error.starts_with("SQL compilation error: invalid identifier 'EMAL'"));
    assert!(error.contains("Column 'EMAL' does not exist in the table."));
    assert!(error.contains("DESCRIBE TABLE"));
    assert!(error.ends_with("Query: SELECT emal FROM users"));
}
