//! Main entry point for the site server binary

use anyhow::Result;
use site_core::{create_app, run_server, AppState};
use site_server::init_tracing;
use std::{net::SocketAddr, time::Duration};
use tracing::{debug, info, warn};

const VISITOR_PRUNE_INTERVAL: Duration = Duration::from_secs(60);
const VISITOR_MAX_IDLE: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let state = AppState::load()
        .map_err(|e| anyhow::anyhow!("Failed to initialize application state: {}", e))?;
    let config = state.config.clone();

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!("Environment: {}", config.site.environment);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    if !config.site.public_dir.is_dir() {
        warn!(
            "Public directory {} does not exist; static files will 404",
            config.site.public_dir.display()
        );
    }

    let settings = state.client.settings();
    info!("App: {} v{}", state.app_name, state.version);
    info!(
        "Form backend: {} (origin {}, mock mode {})",
        settings.base_url,
        settings.origin.as_str(),
        if settings.mock_enabled { "on" } else { "off" }
    );

    let visitors = state.visitors.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(VISITOR_PRUNE_INTERVAL);
        loop {
            interval.tick().await;

            let removed = visitors.prune_idle(VISITOR_MAX_IDLE);
            if removed > 0 {
                debug!("Pruned {} idle visitor(s)", removed);
            }
        }
    });

    let app = create_app(state);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}
