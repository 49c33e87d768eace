//! db-gateway - a local read-only SQL query gateway.

use std::sync::Arc;

use db_gateway::cli::Cli;
use db_gateway::config::{Config, ConnectionConfig};
use db_gateway::db::{self, DatabaseClient, MockDatabaseClient};
use db_gateway::error::{GatewayError, Result};
use db_gateway::logging;
use db_gateway::query::QueryExecutor;
use db_gateway::server::{self, AppState};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    match cli.log_path() {
        Some(path) => logging::init_file_logging(&path),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_server_overrides(&mut config.server);

    let client: Arc<dyn DatabaseClient> = if cli.mock_db {
        warn!("Using in-memory mock database");
        Arc::new(MockDatabaseClient::new())
    } else {
        let connection = resolve_connection(&cli, &config)?;
        info!("Connecting to {}", connection.display_string());
        Arc::from(db::connect(&connection, config.server.query_timeout()).await?)
    };

    let executor = QueryExecutor::from_config(client.clone(), &config.server);
    let result = server::serve(&config.server.socket_addr(), AppState::new(executor)).await;

    client.close().await?;
    result
}

/// Resolves the final connection configuration from CLI args, config file, and environment.
///
/// Precedence: CLI arguments, then the named connection, then the default
/// connection, then `PG*` environment variables.
fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    let from_config = match cli.connection_name() {
        Some(name) => Some(config.get_connection(Some(name)).cloned().ok_or_else(|| {
            GatewayError::config(format!("Connection '{}' not found in config file", name))
        })?),
        None => config.get_connection(None).cloned(),
    };

    ConnectionConfig::resolve(from_config, cli.to_connection_config()?)
}
