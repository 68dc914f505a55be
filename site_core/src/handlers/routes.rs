//! Route table of the site server

use super::{forms::submit_form, health::handle_health, sitemap::handle_sitemap};
use crate::{
    models::{BookingSubmission, ContactSubmission},
    AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/forms/contact", post(submit_form::<ContactSubmission>))
        .route("/api/forms/booking", post(submit_form::<BookingSubmission>))
        .route("/sitemap.xml", get(handle_sitemap))
}
