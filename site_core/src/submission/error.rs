use std::time::Duration;
use thiserror::Error;

/// Failures the submission client surfaces to the form.
///
/// Cross-origin rejections never appear here: they are absorbed by the
/// mock fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Please wait {} seconds before submitting again.", retry_after_seconds(.retry_after))]
    RateLimited { retry_after: Duration },

    #[error("The request timed out. Please try again.")]
    Timeout,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("{message}")]
    RequestFailed { status: Option<u16>, message: String },
}

fn retry_after_seconds(retry_after: &Duration) -> u64 {
    let millis = retry_after.as_millis() as u64;
    millis.div_ceil(1000).max(1)
}

impl SubmissionError {
    /// Message suitable for the banner and toast of the form.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Transport(_) => {
                "We couldn't reach our server. Please check your connection and try again."
                    .to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SubmissionError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    pub fn retry_after_seconds(&self) -> Option<u64> {
        self.retry_after().map(|retry_after| retry_after_seconds(&retry_after))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message_rounds_up() {
        let err = SubmissionError::RateLimited {
            retry_after: Duration::from_millis(2_100),
        };
        assert_eq!(err.to_string(), "Please wait 3 seconds before submitting again.");
        assert_eq!(err.retry_after_seconds(), Some(3));

        let err = SubmissionError::RateLimited {
            retry_after: Duration::from_millis(10),
        };
        assert_eq!(err.retry_after_seconds(), Some(1));
    }

    #[test]
    fn test_transport_details_stay_out_of_user_message() {
        let err = SubmissionError::Transport("dns error: no such host".to_string());
        assert!(!err.user_message().contains("dns"));
        assert!(err.to_string().contains("dns"));
    }

    #[test]
    fn test_request_failed_shows_server_message() {
        let err = SubmissionError::RequestFailed {
            status: Some(400),
            message: "Email domain not accepted".to_string(),
        };
        assert_eq!(err.user_message(), "Email domain not accepted");
        assert!(err.retry_after().is_none());
    }
}
