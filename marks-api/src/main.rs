mod config;
mod dataset;
mod handlers;
mod server;
mod state;

use config::Config;
use state::AppState;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path = std::env::var("MARKS_API_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = Config::from_file_or_default(&config_path)?.apply_env_overrides();

    // The dataset is read here, once, before the listener is bound.
    let state = Arc::new(AppState::from_config(&cfg));

    let app = server::app(state);

    let addr: SocketAddr = cfg.listen_addr().parse()?;
    info!(%addr, "Starting marks-api");

    let server = axum::Server::bind(&addr).serve(app.into_make_service());

    let graceful = server.with_graceful_shutdown(shutdown_signal());
    graceful.await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
