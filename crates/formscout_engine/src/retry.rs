//! Bounded retry for transient fetch failures.
//!
//! Which failures are transient is decided here; the loop and the backoff
//! schedule come from `tokio-retry`.

use std::time::Duration;

use tokio_retry::strategy::{jitter, ExponentialBackoff};

use crate::{FailureKind, FetchError};

/// Exponential backoff with a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; zero disables retrying.
    pub max_retries: usize,
    /// Delay before the first retry; doubles on each further retry.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Randomise each delay between zero and its nominal value.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delays to sleep between attempts, one per retry.
    pub fn backoff(&self) -> Vec<Duration> {
        // `from_millis(2)` yields 2, 4, 8.. ms; the factor rescales that to base, 2*base, ..
        let factor = (self.base_delay.as_millis() / 2).max(1) as u64;
        let schedule = ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(self.max_delay)
            .take(self.max_retries);

        if self.jitter {
            schedule.map(jitter).collect()
        } else {
            schedule.collect()
        }
    }
}

/// Classify an HTTP status code for retry decisions.
pub fn is_retryable_status(code: u16) -> bool {
    matches!(code, 429 | 500..=599)
}

/// True for failures a later attempt might not hit.
pub fn is_retryable(err: &FetchError) -> bool {
    match err.kind {
        FailureKind::Timeout | FailureKind::Network | FailureKind::Body => true,
        FailureKind::HttpStatus(code) => is_retryable_status(code),
        FailureKind::InvalidUrl
        | FailureKind::RedirectLimitExceeded
        | FailureKind::TooLarge { .. } => false,
    }
}

/// Log line for a failed attempt, or `None` when the failure is permanent.
pub(crate) fn retry_note(url: &str, err: &FetchError, retries_left: usize) -> Option<String> {
    if !is_retryable(err) {
        return None;
    }
    Some(if retries_left == 0 {
        format!("transient failure for {url}, no retries left: {err}")
    } else {
        format!("transient failure for {url}, retrying ({retries_left} left): {err}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_millis(1000),
            jitter: false,
        };
        let delays: Vec<u64> = policy
            .backoff()
            .into_iter()
            .map(|d| d.as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![200, 400, 800, 1000, 1000]);
    }

    #[test]
    fn jittered_delays_stay_under_nominal() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(150),
            jitter: true,
        };
        let delays = policy.backoff();
        assert_eq!(delays.len(), 3);
        assert!(delays.iter().all(|d| *d <= Duration::from_millis(150)));
    }

    #[test]
    fn no_retries_means_no_delays() {
        assert!(RetryPolicy::none().backoff().is_empty());
    }

    #[test]
    fn http_429_and_5xx_retryable() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(403));
        assert!(!is_retryable_status(302));
    }

    #[test]
    fn note_does_not_promise_a_retry_without_budget() {
        let err = FetchError::new(FailureKind::Network, "connection refused");
        let note = retry_note("http://127.0.0.1:1/", &err, 0).unwrap();
        assert!(!note.contains("retrying"));
        assert!(note.contains("no retries left"));

        let note = retry_note("http://127.0.0.1:1/", &err, 2).unwrap();
        assert!(note.contains("retrying (2 left)"));

        let invalid = FetchError::new(FailureKind::InvalidUrl, "bad");
        assert_eq!(retry_note("x", &invalid, 3), None);
    }

    #[test]
    fn permanent_failures_are_not_retried() {
        assert!(!is_retryable(&FetchError::new(FailureKind::InvalidUrl, "bad")));
        assert!(!is_retryable(&FetchError::new(
            FailureKind::TooLarge {
                max_bytes: 1,
                actual: Some(2)
            },
            "big"
        )));
        assert!(is_retryable(&FetchError::new(FailureKind::Timeout, "slow")));
        assert!(is_retryable(&FetchError::new(FailureKind::HttpStatus(502), "gw")));
    }
}
