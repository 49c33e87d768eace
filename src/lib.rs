//! db-gateway - a local read-only SQL query gateway.
//!
//! The `enhance` module holds the error enhancement and retriability logic;
//! the remaining modules make up the daemon around it.

pub mod cli;
pub mod config;
pub mod db;
pub mod enhance;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod safety;
pub mod server;
