use std::time::Duration;
use crate::error::PipelineError;

/// Notified as the retry loop progresses. Individual failures stop here; the
/// caller only ever sees the final outcome.
pub trait RetryObserver: Send + Sync {
    /// An attempt failed; `backoff` is the pause before the next one, `None` if none follows
    fn on_attempt_failed(&self, attempt: u32, max_attempts: u32, error: &PipelineError, backoff: Option<Duration>);

    fn on_success(&self, attempt: u32);

    fn on_exhausted(&self, attempts: u32);
}

/// Reports retry progress through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn on_attempt_failed(&self, attempt: u32, max_attempts: u32, error: &PipelineError, backoff: Option<Duration>) {
        tracing::warn!("attempt {}/{} failed to generate: {}", attempt, max_attempts, error);
        if let Some(backoff) = backoff {
            tracing::warn!("retrying in {:?}...", backoff);
        }
    }

    fn on_success(&self, attempt: u32) {
        if attempt > 1 {
            tracing::info!("completion succeeded on attempt {}", attempt);
        } else {
            tracing::debug!("completion succeeded on first attempt");
        }
    }

    fn on_exhausted(&self, attempts: u32) {
        tracing::error!("giving up after {} attempts", attempts);
    }
}
