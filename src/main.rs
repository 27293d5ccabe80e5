mod routes;    // HTTP boundary: request validation, planning, response
mod settings;  // layered TOML + environment configuration
mod sources;   // position sources: dataset file or remote catalog

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

use routes::AppState;
use sources::Catalog;

/// Overrides the configuration file location.
const CONFIG_PATH_ENV: &str = "PICKING_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Picking route server starting...");

    if let Err(e) = run().await {
        error!("Picking route server failed: {:?}", e);
        return Err(e);
    }

    info!("Picking route server stopped.");
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .unwrap_or_else(|_| settings::DEFAULT_CONFIG_PATH.to_string());
    let settings = settings::load_config(&config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path))?;

    let catalog = Catalog::from_settings(&settings.lookup)?;
    let state = AppState::new(catalog, settings.lookup.collect_options());

    let address = settings.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(%address, path = routes::OPTIMIZE_PICKING_PATH, "Listening for picking requests");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections."),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
