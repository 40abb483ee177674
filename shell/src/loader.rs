//! Resilient module loading: bounded retry with a constant delay.
//!
//! DESIGN
//! ======
//! A page module load is an async operation that may fail. The loader runs
//! it, and on failure waits a fixed delay and tries again until the retry
//! bound is spent, then surfaces the last error. Attempts are strictly
//! sequential. The delay never grows.
//!
//! The wait goes through a [`Timer`] so the browser can use its own timers
//! and tests can use paused tokio time or no time at all.
//!
//! TRADE-OFFS
//! ==========
//! [`RetryOn::AnyFailure`] retries every error, including ones that cannot
//! heal such as a missing module. [`RetryOn::TransientOnly`] stops at the
//! first non-fetch failure instead. Cancellation is never retried.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::LoadError;

pub const DEFAULT_LOAD_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Host sleep primitive.
pub trait Timer: Send + Sync {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Which failures are worth another attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryOn {
    /// Retry every failure.
    #[default]
    AnyFailure,
    /// Retry only failures that may heal on their own.
    TransientOnly,
}

/// Retry bound, delay and classification for one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub retries: u32,
    /// Wait between attempts.
    pub delay: Duration,
    pub retry_on: RetryOn,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_LOAD_RETRIES,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            retry_on: RetryOn::AnyFailure,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn should_retry(&self, error: &LoadError) -> bool {
        if error.is_cancelled() {
            return false;
        }
        match self.retry_on {
            RetryOn::AnyFailure => true,
            RetryOn::TransientOnly => error.is_transient(),
        }
    }

    /// Upper bound on attempts for one load.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Runs module loads under a [`RetryPolicy`].
#[derive(Clone)]
pub struct Loader {
    policy: RetryPolicy,
    timer: Arc<dyn Timer>,
    diagnostics: Diagnostics,
}

impl Loader {
    pub fn new(policy: RetryPolicy, timer: Arc<dyn Timer>, diagnostics: Diagnostics) -> Self {
        Self { policy, timer, diagnostics }
    }

    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Invoke `op` until it succeeds or the retry bound is spent.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt when every attempt failed, or
    /// the first error the policy declines to retry.
    pub async fn load_with_retry<M, F, Fut>(&self, module: &str, mut op: F) -> Result<M, LoadError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<M, LoadError>>,
    {
        let mut remaining = self.policy.retries;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(loaded) => {
                    if attempt > 1 {
                        debug!(%module, attempt, "module loaded after retry");
                    }
                    return Ok(loaded);
                }
                Err(error) if error.is_cancelled() => return Err(error),
                Err(error) if remaining > 0 && self.policy.should_retry(&error) => {
                    self.diagnostics.record(&Diagnostic::LoadRetry {
                        module: module.to_owned(),
                        attempt,
                        remaining,
                        error: error.to_string(),
                    });
                    self.timer.sleep(self.policy.delay).await;
                    remaining -= 1;
                }
                Err(error) => {
                    self.diagnostics.record(&Diagnostic::LoadFailed {
                        module: module.to_owned(),
                        attempts: attempt,
                        error: error.to_string(),
                    });
                    return Err(error);
                }
            }
        }
    }
}

impl std::fmt::Debug for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader").field("policy", &self.policy).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
