//! Shell configuration parsed from environment variables.
//!
//! In the browser none of these variables exist and the defaults apply; the
//! variables matter for native builds and tests.

use std::time::Duration;

use crate::error::ShellError;
use crate::loader::{DEFAULT_LOAD_RETRIES, DEFAULT_RETRY_DELAY_MS, RetryOn, RetryPolicy};

pub const DEFAULT_MOUNT_ID: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Additional load attempts after the first failure.
    pub load_retries: u32,
    /// Constant wait between load attempts, in milliseconds.
    pub retry_delay_ms: u64,
    pub retry_on: RetryOn,
    /// Id of the element the application mounts into.
    pub mount_id: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            load_retries: DEFAULT_LOAD_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            retry_on: RetryOn::AnyFailure,
            mount_id: DEFAULT_MOUNT_ID.to_owned(),
        }
    }
}

impl ShellConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `SHELL_LOAD_RETRIES`: default 3
    /// - `SHELL_RETRY_DELAY_MS`: default 1000
    /// - `SHELL_RETRY_ON`: `any` (default) or `transient`
    /// - `SHELL_MOUNT_ID`: default `root`
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Config`] for an unknown `SHELL_RETRY_ON` value.
    pub fn from_env() -> Result<Self, ShellError> {
        let retry_on = parse_retry_on(std::env::var("SHELL_RETRY_ON").as_deref().unwrap_or("any"))?;
        Ok(Self {
            load_retries: env_parse("SHELL_LOAD_RETRIES", DEFAULT_LOAD_RETRIES),
            retry_delay_ms: env_parse("SHELL_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS),
            retry_on,
            mount_id: std::env::var("SHELL_MOUNT_ID").unwrap_or_else(|_| DEFAULT_MOUNT_ID.to_owned()),
        })
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.load_retries,
            delay: Duration::from_millis(self.retry_delay_ms),
            retry_on: self.retry_on,
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_retry_on(raw: &str) -> Result<RetryOn, ShellError> {
    match raw.trim() {
        "any" => Ok(RetryOn::AnyFailure),
        "transient" => Ok(RetryOn::TransientOnly),
        other => Err(ShellError::Config(format!(
            "unsupported SHELL_RETRY_ON '{other}' (expected 'any' or 'transient')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
