//! Health check handler

use crate::{models::request::ApiResponse, AppState};
use axum::{extract::State, response::IntoResponse, Json};
use tracing::debug;

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    debug!("GET /health");

    let settings = state.client.settings();

    Json(ApiResponse::success(serde_json::json!({
        "status": "healthy",
        "app": state.app_name,
        "version": state.version,
        "environment": state.config.site.environment.to_string(),
        "origin": settings.origin.as_str(),
        "mock_mode": settings.mock_enabled,
        "visitors": state.visitors.visitor_count(),
        "timestamp": chrono::Utc::now().timestamp(),
    })))
}
