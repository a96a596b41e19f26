use core_config::retry::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tracing::info;

use crate::error::{ProductError, ProductResult, StoreError};

/// Bounded retry for read-modify-write cycles that lose a version race.
///
/// Only [`StoreError::Conflict`] is retried. The delay starts at
/// `initial_backoff` and doubles up to `max_backoff`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before attempt `attempt + 1`, where `attempt` starts at 1.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Run `operation` until it succeeds, fails with something other than a
    /// conflict, or the attempts run out.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> ProductResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ProductResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Err(ProductError::Store(StoreError::Conflict { path })) => {
                    if attempt >= max_attempts {
                        return Err(ProductError::Conflict { attempts: attempt });
                    }
                    let delay = self.backoff(attempt);
                    info!(
                        attempt,
                        max_attempts,
                        path = %path,
                        delay_ms = delay.as_millis() as u64,
                        "Version conflict, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
