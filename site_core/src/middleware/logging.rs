//! Request logging middleware configuration

use http::{Request, Response};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnRequest, MakeSpan, OnResponse, TraceLayer};
use tracing::{info_span, Level, Span};

pub type SiteTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpan,
    DefaultOnRequest,
    StatusLogger,
    tower_http::trace::DefaultOnBodyChunk,
    tower_http::trace::DefaultOnEos,
    DefaultOnFailure,
>;

/// One `http_request` span per request, tagged with method and path.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        info_span!(
            "http_request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

/// Logs completed responses at a level matching their status class.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusLogger;

impl<B> OnResponse<B> for StatusLogger {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status();
        let latency_ms = latency.as_millis() as u64;

        if status.is_success() || status.is_redirection() {
            tracing::info!(status = status.as_u16(), latency_ms, "request completed");
        } else if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), latency_ms, "client error response");
        } else {
            tracing::error!(status = status.as_u16(), latency_ms, "server error response");
        }
    }
}

pub fn logging_layer() -> SiteTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(StatusLogger)
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}
