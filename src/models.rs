//! Request and response payloads for the HTTP API.

use crate::db::Row;
use serde::{Deserialize, Deserializer, Serialize};

/// Output format for the `formatted` field of a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text table.
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: table, json, or csv"
            )),
        }
    }
}

/// Keeps an explicit `null` apart from a missing field.
fn explicit_limit<'de, D>(deserializer: D) -> std::result::Result<Option<Option<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u32>::deserialize(deserializer).map(Some)
}

/// Body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub sql: String,

    /// Row limit injected into SELECTs. Absent means the configured default,
    /// `null` disables it.
    #[serde(
        default,
        deserialize_with = "explicit_limit",
        skip_serializing_if = "Option::is_none"
    )]
    pub limit: Option<Option<u32>>,

    #[serde(default)]
    pub format: OutputFormat,
}

impl QueryRequest {
    /// The limit to inject, falling back to `default` when the field was absent.
    pub fn effective_limit(&self, default: u32) -> Option<u32> {
        self.limit.unwrap_or(Some(default))
    }
}

/// Result of a query attempt. Failures are reported in-band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    pub data: Option<Vec<Row>>,
    pub columns: Option<Vec<String>>,
    pub row_count: Option<usize>,
    pub formatted: Option<String>,
    /// Enhanced error message on failure.
    pub error: Option<String>,
    /// Wall-clock seconds spent, including retries.
    pub execution_time: Option<f64>,
}

impl QueryResponse {
    /// Creates a failed response carrying `error`.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Sets the execution time in seconds.
    pub fn with_execution_time(mut self, seconds: f64) -> Self {
        self.execution_time = Some(seconds);
        self
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: String,
    pub uptime_seconds: f64,
    pub connection_count: usize,
    pub active_queries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_request_defaults() {
        let request: QueryRequest = serde_json::from_str(r#"{"sql": "SELECT 1"}"#).unwrap();
        assert_eq!(request.limit, None);
        assert_eq!(request.effective_limit(50), Some(50));
        assert_eq!(request.format, OutputFormat::Table);
    }

    #[test]
    fn test_query_request_explicit_fields() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"sql": "SELECT 1", "limit": null, "format": "csv"}"#)
                .unwrap();
        assert_eq!(request.limit, Some(None));
        assert_eq!(request.effective_limit(50), None);
        assert_eq!(request.format, OutputFormat::Csv);
    }

    #[test]
    fn test_query_request_explicit_limit_wins() {
        let request: QueryRequest =
            serde_json::from_str(r#"{"sql": "SELECT 1", "limit": 7}"#).unwrap();
        assert_eq!(request.effective_limit(50), Some(7));
    }

    #[test]
    fn test_failure_serializes_nulls() {
        let response = QueryResponse::failure("boom").with_execution_time(0.5);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["execution_time"], 0.5);
        assert!(json["data"].is_null());
        assert!(json["columns"].is_null());
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
