//! Bounded retry with doubling backoff
//!
//! After the `n`-th failed attempt the policy waits `base * 2^n`, clamped to
//! `[floor, ceiling]`. With the defaults that is 4s, 4s, 8s, 10s, ... and at
//! most three attempts are made. Only transient errors are retried; the last
//! error is handed back unchanged.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts in total, the first call included
    pub max_attempts: u32,
    pub base: Duration,
    pub floor: Duration,
    pub ceiling: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_secs(1),
            floor: Duration::from_secs(4),
            ceiling: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base: Duration::ZERO,
            floor: Duration::ZERO,
            ceiling: Duration::ZERO,
        }
    }

    /// Three attempts with millisecond waits, for tests
    pub fn fast() -> Self {
        Self {
            max_attempts: 3,
            base: Duration::from_millis(1),
            floor: Duration::from_millis(1),
            ceiling: Duration::from_millis(5),
        }
    }

    /// Wait after `failed` attempts have failed
    pub fn backoff_duration(&self, failed: u32) -> Duration {
        if failed == 0 {
            return Duration::ZERO;
        }
        let factor = 2u32.saturating_pow(failed);
        self.base
            .saturating_mul(factor)
            .clamp(self.floor, self.ceiling.max(self.floor))
    }

    /// Run `operation` until it succeeds, fails permanently, or attempts run out
    ///
    /// `label` only appears in log lines.
    pub async fn execute<F, Fut, T>(&self, label: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut failed = 0;

        loop {
            let err = match operation().await {
                Ok(value) => {
                    if failed > 0 {
                        debug!("{} recovered after {} failed attempt(s)", label, failed);
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };
            failed += 1;

            if !err.is_transient() {
                debug!("{} failed permanently: {}", label, err);
                return Err(err);
            }
            if failed >= attempts {
                warn!("{} gave up after {} attempts: {}", label, failed, err);
                return Err(err);
            }

            let wait = self.backoff_duration(failed);
            warn!(
                "{} attempt {}/{} failed: {}. Retrying in {:?}",
                label, failed, attempts, err, wait
            );
            tokio::time::sleep(wait).await;
        }
    }
}
