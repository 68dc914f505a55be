//! Per-form-kind cooldown between accepted submissions

use crate::models::FormKind;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Last accepted submission time of each form kind.
///
/// Owned by whoever scopes the cooldown (one form session, one visitor)
/// and handed to the submission client by reference.
#[derive(Debug, Default)]
pub struct RateLimitState {
    last_accepted: Mutex<HashMap<FormKind, Instant>>,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts the submission and records it, or returns how long is left
    /// of the cooldown.
    pub fn try_acquire(&self, kind: FormKind, cooldown: Duration) -> Result<(), Duration> {
        let now = Instant::now();
        let mut last_accepted = self.last_accepted.lock();

        if let Some(previous) = last_accepted.get(&kind) {
            let elapsed = now.saturating_duration_since(*previous);
            if elapsed < cooldown {
                return Err(cooldown - elapsed);
            }
        }

        last_accepted.insert(kind, now);
        Ok(())
    }

    pub fn last_accepted(&self, kind: FormKind) -> Option<Instant> {
        self.last_accepted.lock().get(&kind).copied()
    }

    pub fn reset(&self) {
        self.last_accepted.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_millis(3_000);

    #[tokio::test(start_paused = true)]
    async fn test_second_attempt_within_cooldown_is_rejected() {
        let state = RateLimitState::new();

        assert!(state.try_acquire(FormKind::Contact, COOLDOWN).is_ok());

        tokio::time::advance(Duration::from_millis(1_000)).await;
        let remaining = state.try_acquire(FormKind::Contact, COOLDOWN).unwrap_err();
        assert_eq!(remaining, Duration::from_millis(2_000));

        tokio::time::advance(Duration::from_millis(2_000)).await;
        assert!(state.try_acquire(FormKind::Contact, COOLDOWN).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_kinds_are_independent() {
        let state = RateLimitState::new();

        assert!(state.try_acquire(FormKind::Contact, COOLDOWN).is_ok());
        assert!(state.try_acquire(FormKind::Booking, COOLDOWN).is_ok());
        assert!(state.try_acquire(FormKind::Booking, COOLDOWN).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_does_not_extend_cooldown() {
        let state = RateLimitState::new();
        state.try_acquire(FormKind::Contact, COOLDOWN).unwrap();
        let first = state.last_accepted(FormKind::Contact).unwrap();

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(state.try_acquire(FormKind::Contact, COOLDOWN).is_err());
        assert_eq!(state.last_accepted(FormKind::Contact), Some(first));

        state.reset();
        assert!(state.last_accepted(FormKind::Contact).is_none());
    }
}
