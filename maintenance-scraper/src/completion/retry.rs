use std::future::Future;
use std::time::Duration;
use crate::completion::RetryObserver;
use crate::error::PipelineError;

/// Bounded retry with a fixed pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Deadline for a single attempt, independent of any client timeout
    pub attempt_timeout: Duration,
    pub backoff: Duration,
}

/// Run `attempt` until it succeeds or the policy's attempt budget is spent.
///
/// Attempts run strictly one after another. Each is bounded by
/// `policy.attempt_timeout`; a timeout counts as a failed attempt. No pause
/// follows the final failure.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    observer: &dyn RetryObserver,
    mut attempt: F,
) -> Result<T, PipelineError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, PipelineError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        let outcome = match tokio::time::timeout(policy.attempt_timeout, attempt(attempts + 1)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(PipelineError::TransientCompletion(format!(
                "no response within {:?}",
                policy.attempt_timeout
            ))),
        };

        let error = match outcome {
            Ok(value) => {
                observer.on_success(attempts + 1);
                return Ok(value);
            }
            Err(error) => error,
        };

        attempts += 1;

        if attempts >= max_attempts {
            observer.on_attempt_failed(attempts, max_attempts, &error, None);
            observer.on_exhausted(attempts);
            return Err(PipelineError::MaxRetriesExceeded {
                attempts,
                last_error: error.to_string(),
            });
        }

        observer.on_attempt_failed(attempts, max_attempts, &error, Some(policy.backoff));
        tokio::time::sleep(policy.backoff).await;
    }
}
