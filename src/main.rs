//! TeamPulse server
//!
//! Entry point: loads configuration, initializes logging and serves the API.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;

use teampulse::config::AppConfig;
use teampulse::pulse::telemetry;
use teampulse::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    telemetry::init(config.log.json);

    info!(
        name: "config.loaded",
        host = %config.server.host,
        port = config.server.port,
        provider = ?config.persistence.provider,
        rate_limit_enabled = config.resilience.rate_limit_enabled,
        "Configuration loaded"
    );

    server::start_server(Arc::new(config)).await
}
