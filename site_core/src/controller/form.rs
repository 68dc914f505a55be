//! Form controller: validation, submission and feedback for one form instance

use super::feedback::{Banner, Toast};
use crate::models::{FormFields, FormKind, SubmissionResult};
use crate::submission::{RateLimitState, SubmissionClient, SubmissionError};
use crate::validation::ValidationResult;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    Idle,
    Validating,
    Invalid,
    Submitting,
    Succeeded,
    Failed,
}

impl FormPhase {
    pub fn submit_enabled(&self) -> bool {
        !matches!(self, FormPhase::Submitting)
    }

    pub fn is_outcome(&self) -> bool {
        matches!(self, FormPhase::Invalid | FormPhase::Succeeded | FormPhase::Failed)
    }
}

impl std::fmt::Display for FormPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormPhase::Idle => "idle",
            FormPhase::Validating => "validating",
            FormPhase::Invalid => "invalid",
            FormPhase::Submitting => "submitting",
            FormPhase::Succeeded => "succeeded",
            FormPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Invalid(ValidationResult),
    Succeeded(SubmissionResult),
    Failed(SubmissionError),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded(_))
    }
}

/// Serializable snapshot of a form after a submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView<F: Serialize> {
    pub form: FormKind,
    pub phase: FormPhase,
    pub outcome: Option<FormPhase>,
    pub submit_enabled: bool,
    pub fields: F,
    pub field_errors: ValidationResult,
    pub banner: Option<Banner>,
    pub toasts: Vec<Toast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SubmissionResult>,
}

/// Owns the fields of one form instance and drives
/// Idle → Validating → (Invalid | Submitting → (Succeeded | Failed)) → Idle.
#[derive(Debug, Clone)]
pub struct FormController<F: FormFields> {
    fields: F,
    errors: ValidationResult,
    phase: FormPhase,
    history: Vec<FormPhase>,
    banner: Option<Banner>,
    toasts: Vec<Toast>,
    last_result: Option<SubmissionResult>,
}

impl<F: FormFields> Default for FormController<F> {
    fn default() -> Self {
        Self::with_fields(F::default())
    }
}

impl<F: FormFields> FormController<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(fields: F) -> Self {
        Self {
            fields,
            errors: ValidationResult::success(),
            phase: FormPhase::Idle,
            history: Vec::new(),
            banner: None,
            toasts: Vec::new(),
            last_result: None,
        }
    }

    pub fn kind(&self) -> FormKind {
        F::KIND
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Phases entered during the last submission, in order.
    pub fn history(&self) -> &[FormPhase] {
        &self.history
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.phase.submit_enabled()
    }

    /// Updates a field and clears the error shown beneath it.
    /// Returns `false` when the form has no such field.
    pub fn edit(&mut self, field: &str, value: impl Into<String>) -> bool {
        let Some(canonical) = self.fields.set_field(field, value.into()) else {
            return false;
        };

        self.errors.clear_field(canonical);
        true
    }

    pub async fn submit(
        &mut self,
        client: &SubmissionClient,
        rate_limit: &RateLimitState,
    ) -> SubmitOutcome {
        self.history.clear();
        self.banner = None;
        self.last_result = None;
        self.transition(FormPhase::Validating);

        let errors = self.fields.validate_fields();
        if !errors.is_valid() {
            self.errors = errors.clone();
            self.transition(FormPhase::Invalid);
            self.transition(FormPhase::Idle);
            return SubmitOutcome::Invalid(errors);
        }

        self.errors = ValidationResult::success();
        self.transition(FormPhase::Submitting);

        let outcome = match client.submit(&self.fields.to_submission(), rate_limit).await {
            Ok(result) => {
                self.handle_success(&result);
                SubmitOutcome::Succeeded(result)
            }
            Err(err) => {
                self.handle_failure(&err);
                SubmitOutcome::Failed(err)
            }
        };

        self.transition(FormPhase::Idle);
        outcome
    }

    pub fn view(&self) -> FormView<F>
    where
        F: Serialize,
    {
        FormView {
            form: F::KIND,
            phase: self.phase,
            outcome: self.history.iter().rev().copied().find(FormPhase::is_outcome),
            submit_enabled: self.is_submit_enabled(),
            fields: self.fields.clone(),
            field_errors: self.errors.clone(),
            banner: self.banner.clone(),
            toasts: self.toasts.clone(),
            result: self.last_result.clone(),
        }
    }

    fn handle_success(&mut self, result: &SubmissionResult) {
        let kind = F::KIND;

        self.fields = F::default();
        self.banner = Some(Banner::success(result.message.clone()));
        self.toasts
            .push(Toast::success(kind.success_toast(), Some(result.message.clone())));
        self.last_result = Some(result.clone());

        self.transition(FormPhase::Succeeded);
    }

    fn handle_failure(&mut self, err: &SubmissionError) {
        let kind = F::KIND;
        let message = err.user_message();

        self.banner = Some(Banner::error(message.clone()));
        self.toasts.push(Toast::error(kind.failure_toast(), Some(message)));
        self.last_result = None;

        self.transition(FormPhase::Failed);
    }

    fn transition(&mut self, next: FormPhase) {
        debug!(form = %F::KIND, from = %self.phase, to = %next, "Form phase change");
        self.phase = next;
        self.history.push(next);
    }
}
