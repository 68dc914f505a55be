//! Submission results and the backend's response envelope

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Set when the result was synthesised locally instead of returned by the backend.
    #[serde(default)]
    pub mocked: bool,
}

impl SubmissionResult {
    pub fn mocked(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            reference_id: Some(format!("mock-{}", uuid::Uuid::new_v4())),
            mocked: true,
        }
    }
}

/// `{ success?, message, data? }` as returned by the form backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendResponse {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub data: Option<serde_json::Value>,
}

impl BackendResponse {
    pub fn reference_id(&self) -> Option<String> {
        let data = self.data.as_ref()?;

        ["id", "referenceId"]
            .iter()
            .filter_map(|key| data.get(*key))
            .find_map(|value| match value {
                serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}
