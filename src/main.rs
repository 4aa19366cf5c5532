use approvalwatch::api::{self, ApiState};
use approvalwatch::config::Config;
use approvalwatch::monitor::ApprovalMonitor;
use approvalwatch::store::ApprovalStore;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage.
    // The WebSocket providers need this to establish wss connections.
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("failed to install rustls crypto provider");

    // Load .env if present
    let _ = dotenvy::dotenv();

    // Load config
    let config = if Path::new("approvalwatch.toml").exists() {
        Config::load(Path::new("approvalwatch.toml"))?
    } else {
        info!("no approvalwatch.toml found, using built-in registry");
        Config::default()
    };

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .init();
    }

    info!("approvalwatch v{} starting", env!("CARGO_PKG_VERSION"));

    let store = ApprovalStore::new();
    let monitor = Arc::new(ApprovalMonitor::connect(config.clone(), store).await);

    if config.server.autostart {
        monitor.start().await;
    }

    let state = ApiState {
        monitor: monitor.clone(),
    };
    api::serve(state, &config.server.listen).await?;

    monitor.stop();
    info!("approvalwatch shut down");
    Ok(())
}
