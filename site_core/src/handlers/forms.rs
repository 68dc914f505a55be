//! Contact and booking form submission handlers

use crate::{
    controller::{FormController, FormView, SubmitOutcome},
    extractors::{ClientIp, FormJson},
    models::{request::ApiResponse, FormFields},
    submission::SubmissionError,
    AppState,
};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

pub const INVALID_FORM_MESSAGE: &str = "Please correct the highlighted fields.";
pub const IN_FLIGHT_MESSAGE: &str = "A submission for this form is already in progress.";

/// Runs one submission of `F` for the calling visitor and answers with the
/// resulting form view.
pub async fn submit_form<F>(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    FormJson(fields): FormJson<F>,
) -> Response
where
    F: FormFields + Serialize + DeserializeOwned,
{
    let kind = F::KIND;
    info!("POST /api/forms/{} from {}", kind, ip);

    let Some(_guard) = state.visitors.begin_submission(ip, kind) else {
        warn!("Rejected overlapping {} submission from {}", kind, ip);
        return (
            StatusCode::CONFLICT,
            Json(ApiResponse::<FormView<F>>::error(IN_FLIGHT_MESSAGE.to_string())),
        )
            .into_response();
    };

    let rate_limit = state.visitors.rate_limit_for(ip);
    let mut controller = FormController::with_fields(fields);
    let outcome = controller.submit(&state.client, &rate_limit).await;
    let view = controller.view();

    match outcome {
        SubmitOutcome::Succeeded(result) => (
            StatusCode::OK,
            Json(ApiResponse::with_message(view, true, result.message)),
        )
            .into_response(),
        SubmitOutcome::Invalid(errors) => {
            info!("{} submission failed validation on {} field(s)", kind, errors.len());
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::with_message(
                    view,
                    false,
                    INVALID_FORM_MESSAGE.to_string(),
                )),
            )
                .into_response()
        }
        SubmitOutcome::Failed(err) => failure_response(view, &err),
    }
}

fn failure_response<F: Serialize>(view: FormView<F>, err: &SubmissionError) -> Response {
    let status = match err {
        SubmissionError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        SubmissionError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        SubmissionError::Transport(_) | SubmissionError::RequestFailed { .. } => {
            StatusCode::BAD_GATEWAY
        }
    };

    let body = Json(ApiResponse::with_message(view, false, err.user_message()));
    let mut response = (status, body).into_response();

    if let Some(seconds) = err.retry_after_seconds() {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
    }

    response
}
