//! Integration tests for db-gateway.

pub mod enhance_test;
pub mod gateway_test;
pub mod query_test;
