//! Query execution for the gateway.
//!
//! This module isolates SQL execution, retries and result formatting
//! from the HTTP layer.

pub mod executor;
mod format;

pub use executor::QueryExecutor;
pub use format::format_result;
