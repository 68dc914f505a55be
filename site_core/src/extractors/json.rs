//! JSON extractor for form bodies that answers rejections in the site's error format

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

pub struct FormJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for FormJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FormJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(FormJson(value)),
            Err(rejection) => Err(FormJsonRejection::from(rejection)),
        }
    }
}

#[derive(Debug)]
pub enum FormJsonRejection {
    MissingContentType,
    InvalidJson(String),
    Other(String),
}

impl From<JsonRejection> for FormJsonRejection {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => FormJsonRejection::MissingContentType,
            JsonRejection::JsonDataError(err) => FormJsonRejection::InvalidJson(err.body_text()),
            JsonRejection::JsonSyntaxError(err) => FormJsonRejection::InvalidJson(err.body_text()),
            other => FormJsonRejection::Other(other.body_text()),
        }
    }
}

impl IntoResponse for FormJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            FormJsonRejection::MissingContentType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Expected a request with `Content-Type: application/json`",
            ),
            FormJsonRejection::InvalidJson(detail) => {
                tracing::debug!("Rejected form body: {}", detail);
                (StatusCode::BAD_REQUEST, "Invalid form data")
            }
            FormJsonRejection::Other(detail) => {
                tracing::debug!("Rejected form body: {}", detail);
                (StatusCode::BAD_REQUEST, "Failed to read form data")
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl std::fmt::Display for FormJsonRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormJsonRejection::MissingContentType => write!(f, "Missing JSON content type"),
            FormJsonRejection::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            FormJsonRejection::Other(msg) => write!(f, "JSON error: {}", msg),
        }
    }
}

impl std::error::Error for FormJsonRejection {}
