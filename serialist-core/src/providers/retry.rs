//! Fixed-delay retry policy for provider calls
//!
//! Every failure is retried the same way: authentication errors, 5xx responses,
//! transport errors and missing keys alike. Attempts run strictly one after
//! another with the same pause in between, and the last failure is returned
//! unchanged when attempts run out.

use crate::config::RetrySettings;
use crate::protocol::GenerationResult;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,

    /// Pause between attempts (milliseconds)
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 2_000,
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self::new(settings.max_attempts, Duration::from_millis(settings.delay_ms))
    }
}

impl RetryPolicy {
    /// Create a policy; zero attempts is raised to one
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay_ms: delay.as_millis() as u64,
        }
    }

    /// A policy that makes a single attempt
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Run `operation` until it succeeds or attempts run out
    pub async fn execute<F, Fut>(&self, mut operation: F) -> RetryResult
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GenerationResult>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempts = 0;
        let mut total_delay = Duration::ZERO;

        loop {
            attempts += 1;
            let result = operation().await;

            if result.is_success() || attempts >= max_attempts {
                if let GenerationResult::Failure { kind, message } = &result {
                    error!(
                        "Giving up after {} attempt(s) [{}]: {}",
                        attempts, kind, message
                    );
                }
                return RetryResult {
                    result,
                    attempts,
                    total_delay,
                };
            }

            if let GenerationResult::Failure { kind, message } = &result {
                warn!(
                    "Attempt {}/{} failed [{}]: {}; retrying in {:?}",
                    attempts,
                    max_attempts,
                    kind,
                    message,
                    self.delay()
                );
            }

            tokio::time::sleep(self.delay()).await;
            total_delay += self.delay();
        }
    }

    /// Run `operation` with retries and return only the final result
    pub async fn with_retry<F, Fut>(&self, operation: F) -> GenerationResult
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GenerationResult>,
    {
        self.execute(operation).await.result
    }
}

/// Outcome of a retried operation, with diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryResult {
    /// Final result: the first success or the last failure
    pub result: GenerationResult,

    /// Number of attempts made
    pub attempts: u32,

    /// Total time spent waiting between attempts
    pub total_delay: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ErrorKind;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_attempts_raised_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10));
        assert_eq!(policy.max_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt_does_not_sleep() {
        let policy = RetryPolicy::default();
        let outcome = policy
            .execute(|| async { GenerationResult::success("done") })
            .await;
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.total_delay, Duration::ZERO);
        assert_eq!(outcome.result, GenerationResult::success("done"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_failure_kind_is_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let outcome = policy
            .execute(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    GenerationResult::failure(ErrorKind::Config, format!("missing key {}", n))
                }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.total_delay, Duration::from_secs(4));
        assert_eq!(
            outcome.result,
            GenerationResult::failure(ErrorKind::Config, "missing key 2")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_makes_one_attempt() {
        let calls = AtomicU32::new(0);
        let result = RetryPolicy::no_retry()
            .with_retry(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { GenerationResult::failure(ErrorKind::ProviderHttp, "Error: 500 - x") }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!result.is_success());
    }
}
