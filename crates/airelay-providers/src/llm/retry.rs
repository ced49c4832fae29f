//! Shared retry/backoff/timeout plumbing
//!
//! Every adapter wraps its network attempts in [`call_with_retry`]: a hard
//! wall-clock timeout per attempt, exponential backoff between attempts,
//! and retry only for classified-retryable failures. Dropping the timed-out
//! future cancels the in-flight network call.

use airelay_domain::error::{Error, ProviderErrorKind, Result};
use airelay_domain::value_objects::ProviderId;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Per-adapter retry tuning
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = max_retries + 1)
    pub max_retries: u32,
    /// Delay before the first retry; doubles each subsequent retry
    pub initial_delay: Duration,
    /// Hard wall-clock timeout per attempt
    pub request_timeout: Duration,
}

impl RetryPolicy {
    /// Backoff delay before retry number `retry` (1-based)
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        self.initial_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }
}

/// Run one logical provider call with per-attempt timeout and backoff
///
/// `attempt_fn` is invoked once per attempt. Retryable failures (rate
/// limit, 5xx, timeout) are retried up to `policy.max_retries` times;
/// everything else propagates immediately.
pub async fn call_with_retry<T, F, Fut>(
    provider: ProviderId,
    policy: &RetryPolicy,
    attempt_fn: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;
    loop {
        if attempt > 0 {
            tokio::time::sleep(policy.backoff_delay(attempt)).await;
        }

        let outcome = tokio::time::timeout(policy.request_timeout, attempt_fn()).await;
        let err = match outcome {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => err,
            // Timed-out future is dropped here, cancelling the in-flight call
            Err(_) => Error::provider(
                provider.as_str(),
                format!("request timed out after {:?}", policy.request_timeout),
                ProviderErrorKind::Timeout,
            ),
        };

        if !err.is_retryable() || attempt >= policy.max_retries {
            return Err(err);
        }

        warn!(
            provider = %provider,
            attempt = attempt + 1,
            max_retries = policy.max_retries,
            error = %err,
            "provider attempt failed, retrying with backoff"
        );
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            request_timeout: Duration::from_millis(50),
        }
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            request_timeout: Duration::from_secs(1),
        };
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in = Arc::clone(&calls);
        let result = call_with_retry(ProviderId::OpenAi, &fast_policy(3), move || {
            let calls = Arc::clone(&calls_in);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(Error::provider(
                        "openai",
                        "503",
                        ProviderErrorKind::Server,
                    ))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;
        assert_eq!(result.ok(), Some("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_failure_propagates_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in = Arc::clone(&calls);
        let result: Result<&str> =
            call_with_retry(ProviderId::OpenAi, &fast_policy(3), move || {
                let calls = Arc::clone(&calls_in);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(Error::provider("openai", "401", ProviderErrorKind::Auth))
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn timeout_counts_as_retryable_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in = Arc::clone(&calls);
        let result: Result<&str> =
            call_with_retry(ProviderId::Anthropic, &fast_policy(1), move || {
                let calls = Arc::clone(&calls_in);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok("never")
                }
            })
            .await;
        assert!(matches!(
            result,
            Err(Error::Provider {
                kind: ProviderErrorKind::Timeout,
                ..
            })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
