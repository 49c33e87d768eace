//! Query execution with read-only validation and transient-failure retries.
//!
//! Wraps a `DatabaseClient`: rejects writes, bounds SELECTs with a LIMIT,
//! resubmits transient failures and turns final failures into enhanced
//! messages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::db::{DatabaseClient, QueryResult};
use crate::enhance::{classify, enhance, is_retriable};
use crate::error::Result;
use crate::models::{OutputFormat, QueryResponse};
use crate::safety::{apply_limit, validate_read_only};

use super::format_result;

/// Row limit used when neither the request nor the config names one.
pub const DEFAULT_LIMIT: u32 = 100;

/// Query executor shared by all request handlers.
pub struct QueryExecutor {
    db: Arc<dyn DatabaseClient>,
    default_limit: u32,
    max_retries: u32,
    retry_delay: Duration,
    active_queries: AtomicUsize,
}

impl QueryExecutor {
    /// Creates an executor that never resubmits and bounds SELECTs to
    /// `DEFAULT_LIMIT` rows unless told otherwise.
    pub fn new(db: Arc<dyn DatabaseClient>) -> Self {
        Self {
            db,
            default_limit: DEFAULT_LIMIT,
            max_retries: 0,
            retry_delay: Duration::ZERO,
            active_queries: AtomicUsize::new(0),
        }
    }

    /// Creates an executor using the default limit and retry policy from `config`.
    pub fn from_config(db: Arc<dyn DatabaseClient>, config: &ServerConfig) -> Self {
        Self::new(db)
            .with_default_limit(config.default_limit)
            .with_retry_policy(config.max_retries, config.retry_delay())
    }

    /// Sets the limit applied when a request does not carry one. Zero disables it.
    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Sets how many times a transient failure is resubmitted, and the
    /// initial delay between attempts (doubled after each one).
    pub fn with_retry_policy(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// The underlying database client.
    pub fn client(&self) -> &dyn DatabaseClient {
        self.db.as_ref()
    }

    /// Number of queries currently executing.
    pub fn active_queries(&self) -> usize {
        self.active_queries.load(Ordering::SeqCst)
    }

    /// Validates, bounds and runs `sql`.
    ///
    /// Never fails: rejected statements carry the validation message, and
    /// database failures carry the enhanced error text.
    pub async fn execute(
        &self,
        sql: &str,
        limit: Option<u32>,
        format: OutputFormat,
    ) -> QueryResponse {
        let start = Instant::now();

        let kind = match validate_read_only(sql) {
            Ok(kind) => kind,
            Err(e) => {
                warn!(error = %e, "Rejected statement");
                return QueryResponse::failure(e.to_string());
            }
        };

        let statement = apply_limit(sql, limit);
        debug!(kind = %kind, statement = %statement, "Executing query");

        let result = {
            let _active = ActiveQuery::enter(&self.active_queries);
            self.run_with_retries(&statement).await
        };
        let elapsed = start.elapsed();

        match result {
            Ok(result) => {
                info!(
                    kind = %kind,
                    rows = result.row_count,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Query succeeded"
                );
                success_response(result, format, elapsed)
            }
            Err(e) => {
                let raw = e.to_string();
                warn!(
                    category = %classify(&raw),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Query failed"
                );
                QueryResponse::failure(enhance(&raw, Some(sql)))
                    .with_execution_time(elapsed.as_secs_f64())
            }
        }
    }

    /// Runs a statement, resubmitting while the failure is transient and the
    /// retry budget lasts.
    async fn run_with_retries(&self, sql: &str) -> Result<QueryResult> {
        let mut delay = self.retry_delay;
        let mut attempt = 0;

        loop {
            match self.db.execute_query(sql).await {
                Err(e) if attempt < self.max_retries && is_retriable(&e.to_string()) => {
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "Transient query failure, resubmitting in {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                result => return result,
            }
        }
    }
}

fn success_response(result: QueryResult, format: OutputFormat, elapsed: Duration) -> QueryResponse {
    let formatted = format_result(&result, format);
    let columns = result.column_names();

    QueryResponse {
        success: true,
        row_count: Some(result.row_count),
        columns: Some(columns),
        data: Some(result.rows),
        formatted: Some(formatted),
        error: None,
        execution_time: Some(elapsed.as_secs_f64()),
    }
}

/// Counts a query as active for as long as it is held.
struct ActiveQuery<'a>(&'a AtomicUsize);

impl<'a> ActiveQuery<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ActiveQuery<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
