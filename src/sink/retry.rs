//! Retry governance with exponential backoff and jitter
//!
//! This module defines the backoff policy used to govern retries of
//! imperfect delivery attempts, with exponential backoff and full jitter
//! for handling transient failures.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::config::SinkConfiguration;

/// A stateful sequence of increasing wait durations with a defined
/// exhaustion point.
///
/// One policy instance governs one `write_batch` call; it is advanced once
/// per imperfect attempt and never advanced on a clean one.
pub trait BackoffPolicy: Send {
    /// Advance the policy by one failed attempt.
    ///
    /// Returns `Some(duration)` to wait before the next attempt, or `None`
    /// once the retry budget is exhausted.
    fn next_backoff(&mut self) -> Option<Duration>;
}

/// Constructor for a fresh backoff policy, invoked once per `write_batch`
/// call so concurrent calls never share retry state.
///
/// Injected as a configuration point so callers and tests can bound or make
/// deterministic the retry behavior.
pub type BackoffCtor = Arc<dyn Fn() -> Box<dyn BackoffPolicy> + Send + Sync>;

/// Exponential backoff with an optional full-jitter and an optional bound on
/// the number of retries.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Base delay in milliseconds for exponential backoff
    base_delay_ms: u64,
    /// Maximum delay in milliseconds
    max_delay_ms: u64,
    /// Enable jitter in backoff calculation
    jitter: bool,
    /// Maximum number of retries before exhaustion; `None` is unbounded
    max_retries: Option<u32>,
    /// Failed attempts seen so far (0-indexed exponent)
    attempt: u32,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            base_delay_ms: 100,
            max_delay_ms: 30000,
            jitter: true,
            max_retries: Some(5),
            attempt: 0,
        }
    }
}

impl ExponentialBackoff {
    /// Create a new backoff policy
    ///
    /// # Arguments
    ///
    /// * `base_delay_ms` - Base delay in milliseconds
    /// * `max_delay_ms` - Cap applied to the exponential delay
    /// * `max_retries` - Number of waits granted before exhaustion, or `None`
    ///   for an unbounded policy
    pub fn new(base_delay_ms: u64, max_delay_ms: u64, max_retries: Option<u32>) -> Self {
        Self {
            base_delay_ms,
            max_delay_ms,
            jitter: true,
            max_retries,
            attempt: 0,
        }
    }

    /// Disable or enable full jitter
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Build a policy from the sink configuration's retry settings
    pub fn from_config(config: &SinkConfiguration) -> Self {
        Self::new(
            config.retry_base_delay_ms,
            config.retry_max_delay_ms,
            Some(config.retry_max_retries),
        )
        .with_jitter(config.retry_jitter)
    }

    /// Calculate delay for the given attempt number
    ///
    /// Uses exponential backoff: delay = base_delay * (2 ^ attempt)
    /// With full jitter: random delay between 0 and the calculated
    /// exponential delay.
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponential_delay_ms = self.base_delay_ms.saturating_mul(1 << attempt.min(20));

        let capped_delay_ms = exponential_delay_ms.min(self.max_delay_ms);

        let delay_ms = if self.jitter {
            let mut rng = rand::thread_rng();
            rng.gen_range(0..=capped_delay_ms)
        } else {
            capped_delay_ms
        };

        Duration::from_millis(delay_ms)
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        if let Some(max) = self.max_retries {
            if self.attempt >= max {
                return None;
            }
        }
        let delay = self.calculate_delay(self.attempt);
        self.attempt += 1;
        Some(delay)
    }
}

/// Wraps one backoff policy instance for the duration of one `write_batch`
/// call and decides wait-vs-abort after each imperfect attempt.
pub(crate) struct RetryController {
    policy: Box<dyn BackoffPolicy>,
}

impl RetryController {
    /// Instantiate a fresh policy from the injected constructor
    pub(crate) fn new(ctor: &BackoffCtor) -> Self {
        Self { policy: ctor() }
    }

    /// Record one imperfect attempt
    ///
    /// Returns `Some(duration)` to sleep before retrying, or `None` once the
    /// budget is exhausted and the call must abort.
    pub(crate) fn on_failure(&mut self) -> Option<Duration> {
        self.policy.next_backoff()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_exhausts_after_max_retries() {
        let mut backoff = ExponentialBackoff::new(10, 1000, Some(3)).with_jitter(false);
        assert!(backoff.next_backoff().is_some());
        assert!(backoff.next_backoff().is_some());
        assert!(backoff.next_backoff().is_some());
        assert_eq!(backoff.next_backoff(), None);
        assert_eq!(backoff.next_backoff(), None);
    }

    #[test]
    fn test_backoff_grows_exponentially_and_caps() {
        let mut backoff = ExponentialBackoff::new(100, 400, None).with_jitter(false);
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(400)));
        // capped at max_delay_ms from here on
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(400)));
    }

    #[test]
    fn test_backoff_jitter_stays_within_cap() {
        let mut backoff = ExponentialBackoff::new(100, 400, None);
        for _ in 0..32 {
            let delay = backoff.next_backoff().unwrap();
            assert!(delay <= Duration::from_millis(400));
        }
    }

    #[test]
    fn test_zero_retry_budget_exhausts_immediately() {
        let mut backoff = ExponentialBackoff::new(10, 1000, Some(0));
        assert_eq!(backoff.next_backoff(), None);
    }

    #[test]
    fn test_controller_delegates_to_policy() {
        let ctor: BackoffCtor = Arc::new(|| {
            Box::new(ExponentialBackoff::new(10, 1000, Some(1)).with_jitter(false))
        });
        let mut controller = RetryController::new(&ctor);
        assert_eq!(controller.on_failure(), Some(Duration::from_millis(10)));
        assert_eq!(controller.on_failure(), None);
    }
}
