//! Core library of the marketing site server: form validation, the submission
//! pipeline, the per-form response handling and the HTTP surface around them.

pub mod config;
pub mod controller;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod sitemap;
pub mod submission;
pub mod validation;

pub use config::{ApiSettings, AppConfig, DeploymentOrigin, RuntimeEnvironment};
pub use controller::{FormController, FormPhase, SubmitOutcome};
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use middleware::cors::{cors_layer, cors_layer_from_config};
pub use middleware::rate_limit::VisitorRegistry;
pub use sitemap::SitemapGenerator;
pub use submission::{SubmissionClient, SubmissionError};
pub use validation::{Validatable, ValidationResult};

use axum::Router;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::services::ServeDir;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub config: Arc<AppConfig>,
    pub client: SubmissionClient,
    pub visitors: VisitorRegistry,
}

impl AppState {
    /// Loads the layered configuration and builds the state from it.
    pub fn load() -> Result<Self> {
        Self::from_config(AppConfig::load()?)
    }

    /// Resolves the API settings from `config` and builds the HTTP-backed client.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let settings = ApiSettings::resolve(&config);
        let client = SubmissionClient::new(settings)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: AppConfig, client: SubmissionClient) -> Self {
        Self {
            app_name: "BPS Dynamic Site".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: Arc::new(config),
            client,
            visitors: VisitorRegistry::new(),
        }
    }

    pub fn with_visitors(mut self, visitors: VisitorRegistry) -> Self {
        self.visitors = visitors;
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    let static_files =
        ServeDir::new(&state.config.site.public_dir).append_index_html_on_directories(true);

    Router::new()
        .merge(create_routes())
        .fallback_service(static_files)
        .layer(cors_layer_from_config(&state.config))
        .layer(middleware::logging::logging_layer())
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let app = app.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
