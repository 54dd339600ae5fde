//! webserv - Straylight WebServ
//!
//! Serves the live network state of this services process as JSON.

use slirc_webserv::api::AccessPolicy;
use slirc_webserv::config::{self, Config, MIN_KEY_LEN};
use slirc_webserv::http::{self, AppState};
use slirc_webserv::metrics;
use slirc_webserv::services;
use slirc_webserv::state::Network;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(path = %config_path, "{}", e);
        }
        return Err(anyhow::anyhow!(
            "Invalid configuration ({} errors). See error messages above.",
            errors.len()
        ));
    }

    if config::is_weak_key(&config.webserv.key) {
        warn!(
            minimum = MIN_KEY_LEN,
            "webserv.key is short; anyone who guesses it can read the whole network"
        );
    }

    info!(
        server = %config.server.name,
        sid = %config.server.sid,
        listen = %config.webserv.listen,
        "Starting WebServ"
    );

    // Create the Network (shared state) and introduce ourselves.
    let network = Arc::new(Network::new());
    let webserv = services::introduce(&network, &config, chrono::Utc::now().timestamp())?;
    info!(uid = %webserv.uid, nick = %webserv.nick, "Pseudo-client ready");

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    let metrics_port = config.server.metrics_port.unwrap_or(9090);
    if metrics_port == 0 {
        info!("Metrics disabled");
    } else {
        metrics::init();
        info!("Metrics initialized");

        tokio::spawn(async move {
            http::run_metrics_server(metrics_port).await;
        });
        info!(port = metrics_port, "Prometheus HTTP server started");
    }

    let state = AppState::new(network, AccessPolicy::new(config.webserv.key.clone()));
    http::run_api_server(config.webserv.listen, state, shutdown_signal()).await?;

    info!("WebServ stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
