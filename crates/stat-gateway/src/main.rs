//! Game-time tracker entry point
//!
//! Run with:
//! ```bash
//! cargo run -p stat-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use stat_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Configuration decides the log format, so it loads first
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_app(config.app.env, &config.log)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Gateway failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        app = %config.app.name,
        env = ?config.app.env,
        store = ?config.store.backend,
        port = config.server.port,
        "Configuration loaded"
    );

    stat_gateway::run(config).await?;

    Ok(())
}
