//! Retry and timeout policy for service reads.

use std::future::Future;
use std::time::Duration;

use crate::service::ServiceError;

/// Exponential backoff for transient service failures.
///
/// `max_retries = 0` disables retries: a failed request is surfaced
/// immediately and the view decides whether to trigger it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_base: Duration::ZERO,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Run `call` under `timeout`, retrying transient failures per `policy`.
pub(crate) async fn with_retry<R, F, Fut>(
    domain: &'static str,
    op: &'static str,
    policy: RetryPolicy,
    timeout: Option<Duration>,
    mut call: F,
) -> Result<R, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R, ServiceError>>,
{
    let mut attempt = 0;
    loop {
        let outcome = match timeout {
            Some(limit) => match tokio::time::timeout(limit, call()).await {
                Ok(outcome) => outcome,
                Err(_) => Err(ServiceError::Timeout {
                    ms: limit.as_millis() as u64,
                }),
            },
            None => call().await,
        };

        match outcome {
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.backoff(attempt);
                tracing::warn!(
                    domain,
                    op,
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Retrying service call"
                );
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
}
