use async_trait::async_trait;
use parking_lot::Mutex;
use site_core::{
    config::{AppConfig, RuntimeEnvironment},
    controller::{FormController, FormPhase, SubmitOutcome, Tone},
    models::{BookingSubmission, ContactSubmission},
    submission::{
        FormTransport, OutboundRequest, RateLimitState, SubmissionClient, SubmissionError,
        TransportError, TransportResponse,
    },
    ApiSettings,
};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Default)]
struct FakeBackend {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl FakeBackend {
    fn with(responses: Vec<Result<TransportResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl FormTransport for FakeBackend {
    async fn send(&self, request: &OutboundRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted response".to_string())))
    }
}

fn ok(body: &str) -> Result<TransportResponse, TransportError> {
    Ok(TransportResponse {
        status: 200,
        body: body.to_string(),
    })
}

fn settings(mock: bool) -> ApiSettings {
    let mut config = AppConfig::default();
    config.site.environment = if mock {
        RuntimeEnvironment::Development
    } else {
        RuntimeEnvironment::Production
    };
    config.site.runtime_origin = "https://bpsdynamic.com".to_string();
    config.api.mock_enabled = Some(mock);
    ApiSettings::resolve(&config)
}

fn fill_contact(controller: &mut FormController<ContactSubmission>) {
    assert!(controller.edit("fullName", "Jane Doe"));
    assert!(controller.edit("email", "jane@example.com"));
    assert!(controller.edit("message", "Hi"));
}

#[tokio::test(start_paused = true)]
async fn test_mock_mode_contact_submission_resets_form() {
    let backend = FakeBackend::with(vec![]);
    let client = SubmissionClient::with_transport(settings(true), backend.clone());
    let rate_limit = RateLimitState::new();

    let mut controller = FormController::<ContactSubmission>::new();
    fill_contact(&mut controller);

    let outcome = controller.submit(&client, &rate_limit).await;

    match outcome {
        SubmitOutcome::Succeeded(result) => {
            assert!(result.success);
            assert!(result.mocked);
            assert_eq!(
                result.message,
                "Thank you for your message. We'll get back to you within 24 hours."
            );
        }
        other => panic!("expected success, got {:?}", other),
    }

    assert_eq!(backend.request_count(), 0);
    assert_eq!(controller.fields(), &ContactSubmission::default());
    assert_eq!(controller.phase(), FormPhase::Idle);
    assert_eq!(controller.toasts().len(), 1);
    assert_eq!(controller.toasts()[0].title, "Message Sent!");
    assert_eq!(controller.banner().map(|b| b.tone), Some(Tone::Success));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_contact_never_reaches_backend() {
    let backend = FakeBackend::with(vec![ok(r#"{"success":true,"message":"ok"}"#)]);
    let client = SubmissionClient::with_transport(settings(false), backend.clone());
    let rate_limit = RateLimitState::new();

    let mut controller = FormController::<ContactSubmission>::new();
    controller.edit("fullName", "Jane Doe");
    controller.edit("email", "jane@");
    controller.edit("message", "Hi");

    let outcome = controller.submit(&client, &rate_limit).await;

    match outcome {
        SubmitOutcome::Invalid(errors) => {
            assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
            assert_eq!(errors.len(), 1);
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(backend.request_count(), 0);
    assert!(controller.toasts().is_empty());
    assert_eq!(controller.fields().full_name, "Jane Doe");

    // Invalid attempts do not start the cooldown.
    controller.edit("email", "jane@example.com");
    assert!(controller.errors().get("email").is_none());
    assert!(controller.submit(&client, &rate_limit).await.is_success());
    assert_eq!(backend.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_booking_uses_backend_message_and_reference() {
    let backend = FakeBackend::with(vec![ok(
        r#"{"success":true,"message":"See you soon","data":{"referenceId":42}}"#,
    )]);
    let client = SubmissionClient::with_transport(settings(false), backend.clone());
    let rate_limit = RateLimitState::new();

    let mut controller = FormController::<BookingSubmission>::new();
    controller.edit("name", "Sam Lee");
    controller.edit("email", "sam@example.com");
    controller.edit("service", "ai-implementation");
    controller.edit("message", "Let's talk");

    let outcome = controller.submit(&client, &rate_limit).await;

    let SubmitOutcome::Succeeded(result) = outcome else {
        panic!("expected success");
    };
    assert_eq!(result.message, "See you soon");
    assert_eq!(result.reference_id.as_deref(), Some("42"));
    assert!(!result.mocked);

    let requests = backend.requests.lock();
    assert!(requests[0].url.ends_with("/BookingForm"));
    assert_eq!(requests[0].body["source"], "website_booking_form");
    assert_eq!(requests[0].body["service"], "ai-implementation");
    assert_eq!(controller_toast_title(&controller), "Booking submitted successfully!");
}

fn controller_toast_title(controller: &FormController<BookingSubmission>) -> &str {
    controller.toasts()[0].title.as_str()
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_applies_per_form_kind() {
    let backend = FakeBackend::with(vec![
        ok(r#"{"success":true}"#),
        ok(r#"{"success":true}"#),
    ]);
    let client = SubmissionClient::with_transport(settings(false), backend.clone());
    let rate_limit = RateLimitState::new();

    let mut contact = FormController::<ContactSubmission>::new();
    fill_contact(&mut contact);
    assert!(contact.submit(&client, &rate_limit).await.is_success());

    fill_contact(&mut contact);
    let outcome = contact.submit(&client, &rate_limit).await;
    match outcome {
        SubmitOutcome::Failed(SubmissionError::RateLimited { .. }) => {}
        other => panic!("expected rate limit, got {:?}", other),
    }
    assert_eq!(backend.request_count(), 1);
    assert_eq!(contact.fields().full_name, "Jane Doe");
    assert_eq!(contact.banner().map(|b| b.tone), Some(Tone::Error));

    let mut booking = FormController::<BookingSubmission>::new();
    booking.edit("name", "Sam Lee");
    booking.edit("email", "sam@example.com");
    booking.edit("message", "Hello");
    assert!(booking.submit(&client, &rate_limit).await.is_success());
    assert_eq!(backend.request_count(), 2);

    tokio::time::advance(std::time::Duration::from_millis(3_000)).await;
    let backend_again = FakeBackend::with(vec![ok(r#"{"success":true}"#)]);
    let client_again = SubmissionClient::with_transport(settings(false), backend_again.clone());
    assert!(contact.submit(&client_again, &rate_limit).await.is_success());
    assert_eq!(backend_again.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_submission_keeps_fields_and_shows_error() {
    let backend = FakeBackend::with(vec![Ok(TransportResponse {
        status: 500,
        body: r#"{"message":"Backend unavailable"}"#.to_string(),
    })]);
    let client = SubmissionClient::with_transport(settings(false), backend.clone());
    let rate_limit = RateLimitState::new();

    let mut controller = FormController::<ContactSubmission>::new();
    fill_contact(&mut controller);

    let outcome = controller.submit(&client, &rate_limit).await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed(SubmissionError::RequestFailed { status: Some(500), .. })
    ));
    assert_eq!(controller.fields().email, "jane@example.com");
    assert_eq!(controller.toasts().len(), 1);
    assert_eq!(controller.toasts()[0].title, "Message could not be sent");
    assert_eq!(
        controller.banner().map(|b| b.message.as_str()),
        Some("Backend unavailable")
    );
    assert!(controller.is_submit_enabled());
}
