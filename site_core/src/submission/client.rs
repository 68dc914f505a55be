//! Submission client: cooldown, mock fallback, timeout and retry around a
//! single POST to the form backend.

use super::{
    error::SubmissionError,
    rate_limit::RateLimitState,
    transport::{FormTransport, OutboundRequest, ReqwestTransport, TransportError, TransportResponse},
};
use crate::config::ApiSettings;
use crate::models::{BackendResponse, FormKind, FormSubmission, SubmissionResult};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How a single attempt ended.
#[derive(Debug)]
enum AttemptOutcome {
    Response(TransportResponse),
    TimedOut,
    CrossOrigin(String),
    Failed(String),
}

#[derive(Clone)]
pub struct SubmissionClient {
    settings: Arc<ApiSettings>,
    transport: Arc<dyn FormTransport>,
}

impl SubmissionClient {
    pub fn new(settings: ApiSettings) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(settings.enforce_cors)?;
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    pub fn with_transport(settings: ApiSettings, transport: Arc<dyn FormTransport>) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
        }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    pub fn is_mock_enabled(&self) -> bool {
        self.settings.mock_enabled
    }

    pub async fn submit(
        &self,
        submission: &FormSubmission,
        rate_limit: &RateLimitState,
    ) -> Result<SubmissionResult, SubmissionError> {
        let kind = submission.kind();

        if let Err(retry_after) = rate_limit.try_acquire(kind, self.settings.cooldown) {
            warn!(
                form = %kind,
                retry_after_ms = retry_after.as_millis() as u64,
                "Submission rejected: cooldown still active"
            );
            return Err(SubmissionError::RateLimited { retry_after });
        }

        if self.settings.mock_enabled {
            info!(form = %kind, "Mock mode enabled, answering without contacting the backend");
            return Ok(self.mock_response(kind).await);
        }

        let body = submission.to_payload(Utc::now()).map_err(|e| {
            error!(form = %kind, "Failed to encode submission: {}", e);
            SubmissionError::RequestFailed {
                status: None,
                message: kind.failure_message().to_string(),
            }
        })?;

        let request = OutboundRequest {
            url: self.settings.endpoint(kind.endpoint_path()),
            origin: self.settings.origin.as_str(),
            body,
        };

        let mut attempt: u32 = 1;

        loop {
            debug!(form = %kind, attempt, url = %request.url, origin = request.origin, "Sending form submission");

            match self.attempt(&request).await {
                AttemptOutcome::Response(response) => {
                    return interpret_response(kind, response);
                }
                AttemptOutcome::TimedOut => {
                    warn!(
                        form = %kind,
                        attempt,
                        timeout_ms = self.settings.timeout.as_millis() as u64,
                        "Form submission timed out"
                    );
                    return Err(SubmissionError::Timeout);
                }
                AttemptOutcome::CrossOrigin(reason) => {
                    // The lead is not delivered on this path; the result is flagged `mocked`.
                    warn!(form = %kind, "Backend rejected our origin ({}), falling back to a mock response", reason);
                    return Ok(self.mock_response(kind).await);
                }
                AttemptOutcome::Failed(reason) => {
                    if attempt > self.settings.retries {
                        error!(form = %kind, attempts = attempt, "Form submission failed: {}", reason);
                        return Err(SubmissionError::Transport(reason));
                    }

                    let delay = self.settings.retry_backoff * attempt;
                    warn!(
                        form = %kind,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Form submission failed ({}), retrying",
                        reason
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(&self, request: &OutboundRequest) -> AttemptOutcome {
        match tokio::time::timeout(self.settings.timeout, self.transport.send(request)).await {
            Err(_) => AttemptOutcome::TimedOut,
            Ok(Ok(response)) => AttemptOutcome::Response(response),
            Ok(Err(TransportError::CrossOrigin(reason))) => AttemptOutcome::CrossOrigin(reason),
            Ok(Err(TransportError::Connection(reason))) => AttemptOutcome::Failed(reason),
        }
    }

    async fn mock_response(&self, kind: FormKind) -> SubmissionResult {
        let delay = self.mock_delay();
        debug!(form = %kind, delay_ms = delay.as_millis() as u64, "Simulating backend latency");
        tokio::time::sleep(delay).await;

        SubmissionResult::mocked(kind.default_success_message())
    }

    fn mock_delay(&self) -> Duration {
        let min = self.settings.mock_delay_min.as_millis() as u64;
        let max = self.settings.mock_delay_max.as_millis() as u64;

        if min >= max {
            return Duration::from_millis(min);
        }

        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

fn interpret_response(
    kind: FormKind,
    response: TransportResponse,
) -> Result<SubmissionResult, SubmissionError> {
    let parsed = serde_json::from_str::<BackendResponse>(&response.body).ok();

    if !response.is_success() {
        let message = parsed
            .as_ref()
            .and_then(BackendResponse::message)
            .unwrap_or_else(|| kind.failure_message())
            .to_string();
        warn!(form = %kind, status = response.status, "Backend rejected submission: {}", message);
        return Err(SubmissionError::RequestFailed {
            status: Some(response.status),
            message,
        });
    }

    let parsed = parsed.unwrap_or_default();

    if parsed.success == Some(false) {
        let message = parsed
            .message()
            .unwrap_or_else(|| kind.failure_message())
            .to_string();
        warn!(form = %kind, status = response.status, "Backend reported failure: {}", message);
        return Err(SubmissionError::RequestFailed {
            status: Some(response.status),
            message,
        });
    }

    let reference_id = parsed.reference_id();
    info!(form = %kind, status = response.status, reference_id = ?reference_id, "Form submission accepted");

    Ok(SubmissionResult {
        success: true,
        message: parsed
            .message()
            .unwrap_or_else(|| kind.default_success_message())
            .to_string(),
        reference_id,
        mocked: false,
    })
}
