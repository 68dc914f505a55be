//! Network seam of the submission client

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub origin: &'static str,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The backend does not admit requests from our origin.
    #[error("Cross-origin request rejected: {0}")]
    CrossOrigin(String),

    #[error("Connection failed: {0}")]
    Connection(String),
}

#[async_trait]
pub trait FormTransport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport.
///
/// With `enforce_cors` on, a response that does not admit the declared
/// origin is reported as [`TransportError::CrossOrigin`], the way a browser
/// would refuse to hand it to the page.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    enforce_cors: bool,
}

impl ReqwestTransport {
    pub fn new(enforce_cors: bool) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bps-site/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self::with_client(client, enforce_cors))
    }

    pub fn with_client(client: reqwest::Client, enforce_cors: bool) -> Self {
        Self {
            client,
            enforce_cors,
        }
    }
}

#[async_trait]
impl FormTransport for ReqwestTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .header(ORIGIN, request.origin)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status().as_u16();

        if self.enforce_cors && !admits_origin(response.headers(), request.origin) {
            return Err(TransportError::CrossOrigin(format!(
                "{} answered {} without admitting origin {}",
                request.url, status, request.origin
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(TransportResponse { status, body })
    }
}

pub fn admits_origin(headers: &HeaderMap, origin: &str) -> bool {
    headers
        .get_all(ACCESS_CONTROL_ALLOW_ORIGIN)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|allowed| {
            let allowed = allowed.trim();
            allowed == "*" || allowed.eq_ignore_ascii_case(origin)
        })
}
