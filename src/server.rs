//! HTTP server for the gateway.
//!
//! Exposes `GET /health` and `POST /query`. Query failures are reported
//! in the response body with `success: false`, never as HTTP errors.

use crate::error::{GatewayError, Result};
use crate::models::{HealthResponse, QueryRequest, QueryResponse};
use crate::query::QueryExecutor;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    executor: Arc<QueryExecutor>,
    started_at: Instant,
}

impl AppState {
    /// Create a new AppState around the given executor
    pub fn new(executor: QueryExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
            started_at: Instant::now(),
        }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/query", post(query_handler))
        .with_state(state)
}

/// Binds `addr` and serves until the process receives Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| GatewayError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("Listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Health check endpoint handler
///
/// GET /health
///
/// Reports `healthy` when the database answers a ping, `degraded` otherwise.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let executor = state.executor();
    let status = match executor.client().ping().await {
        Ok(()) => "healthy",
        Err(_) => "degraded",
    };

    Json(HealthResponse {
        status: status.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
        connection_count: executor.client().connection_count(),
        active_queries: executor.active_queries(),
    })
}

/// Query endpoint handler
///
/// POST /query
///
/// A request without `limit` gets the executor's configured default.
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    let executor = state.executor();
    let limit = request.effective_limit(executor.default_limit());
    let response = executor
        .execute(&request.sql, limit, request.format)
        .await;
    Json(response)
}
