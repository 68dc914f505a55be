//! CORS (Cross-Origin Resource Sharing) middleware configuration

use crate::config::{AppConfig, DeploymentOrigin};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::CorsLayer as TowerCorsLayer;

/// Admits the known deployments plus the configured runtime origin.
pub fn cors_layer_from_config(config: &AppConfig) -> TowerCorsLayer {
    let mut allowed_origins: Vec<&str> = DeploymentOrigin::all()
        .iter()
        .map(DeploymentOrigin::as_str)
        .collect();

    let runtime_origin = config.site.runtime_origin.trim_end_matches('/');
    if !allowed_origins.contains(&runtime_origin) {
        allowed_origins.push(runtime_origin);
    }

    cors_layer(allowed_origins)
}

pub fn cors_layer(allowed_origins: Vec<&str>) -> TowerCorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    TowerCorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([HeaderName::from_static("retry-after")])
        .max_age(std::time::Duration::from_secs(3600))
}
