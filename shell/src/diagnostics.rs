//! Diagnostics context for uncaught errors, load retries and boundary catches.
//!
//! DESIGN
//! ======
//! There is no process-wide sink. A [`Diagnostics`] value is constructed once
//! at startup and handed to the loader, the navigator and every boundary.
//! It fans each [`Diagnostic`] out to its sinks; [`TracingSink`] is the
//! production sink and [`MemorySink`] lets tests assert on what was reported.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, warn};

/// One reportable event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A synchronous error escaped every handler.
    UncaughtError { message: String },
    /// An asynchronous rejection escaped every handler.
    UnhandledRejection { reason: String },
    /// A module load failed and will be retried after the configured delay.
    LoadRetry { module: String, attempt: u32, remaining: u32, error: String },
    /// A module load failed for good.
    LoadFailed { module: String, attempts: u32, error: String },
    /// An error boundary caught a failure from its subtree.
    BoundaryCaught { route: String, error: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UncaughtError { message } => write!(f, "uncaught error: {message}"),
            Self::UnhandledRejection { reason } => write!(f, "unhandled rejection: {reason}"),
            Self::LoadRetry { module, attempt, remaining, error } => {
                write!(f, "load of {module} failed (attempt {attempt}, {remaining} left): {error}")
            }
            Self::LoadFailed { module, attempts, error } => {
                write!(f, "load of {module} failed after {attempts} attempts: {error}")
            }
            Self::BoundaryCaught { route, error } => write!(f, "boundary {route} caught: {error}"),
        }
    }
}

/// Destination for diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: &Diagnostic);
}

/// Emits every diagnostic as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: &Diagnostic) {
        match event {
            Diagnostic::UncaughtError { message } => error!(%message, "uncaught application error"),
            Diagnostic::UnhandledRejection { reason } => error!(%reason, "unhandled promise rejection"),
            Diagnostic::LoadRetry { module, attempt, remaining, error } => {
                warn!(%module, attempt, remaining, %error, "module load failed; retrying");
            }
            Diagnostic::LoadFailed { module, attempts, error } => {
                error!(%module, attempts, %error, "module load failed after retries");
            }
            Diagnostic::BoundaryCaught { route, error } => error!(%route, %error, "error boundary caught failure"),
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Count of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| pred(event))
            .count()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: &Diagnostic) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Explicitly constructed diagnostics context.
#[derive(Clone)]
pub struct Diagnostics {
    sinks: Arc<Vec<Arc<dyn DiagnosticSink>>>,
}

impl Diagnostics {
    /// A context with the given sinks.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        Self { sinks: Arc::new(sinks) }
    }

    /// The production context: everything goes to `tracing`.
    #[must_use]
    pub fn tracing() -> Self {
        let sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink);
        Self::new(vec![sink])
    }

    /// Same context plus one more sink.
    #[must_use]
    pub fn with_sink(&self, sink: Arc<dyn DiagnosticSink>) -> Self {
        let mut sinks = self.sinks.as_ref().clone();
        sinks.push(sink);
        Self::new(sinks)
    }

    pub fn record(&self, event: &Diagnostic) {
        for sink in self.sinks.iter() {
            sink.record(event);
        }
    }

    /// Report a synchronous error nothing else handled.
    pub fn uncaught_error(&self, message: impl Into<String>) {
        self.record(&Diagnostic::UncaughtError { message: message.into() });
    }

    /// Report an asynchronous rejection nothing else handled.
    pub fn unhandled_rejection(&self, reason: impl Into<String>) {
        self.record(&Diagnostic::UnhandledRejection { reason: reason.into() });
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics").field("sinks", &self.sinks.len()).finish()
    }
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod tests;
