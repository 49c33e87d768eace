//! Logging configuration for the gateway.
//!
//! Logs go to stderr by default. A daemon started in the background can log
//! to a file instead, by default under the platform state directory.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes logging to stderr.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Initializes logging to the file at `path`, appending across restarts.
///
/// Falls back to stderr if the file cannot be opened.
pub fn init_file_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            init_stderr_logging();
            return;
        }
    }

    let log_file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {e}");
            init_stderr_logging();
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false) // No ANSI colors in file output
        .init();
}

/// Returns the default path for the log file.
///
/// Uses XDG state directory on Linux (`~/.local/state/db-gateway/db-gateway.log`),
/// or falls back to config directory on other platforms.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("db-gateway").join("db-gateway.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("db-gateway").join("db-gateway.log");
    }

    std::env::temp_dir().join("db-gateway.log")
}
