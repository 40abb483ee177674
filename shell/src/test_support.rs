//! Shared fixtures for unit tests.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::LocalBoxFuture;

use crate::diagnostics::{Diagnostics, MemorySink};
use crate::error::LoadError;
use crate::loader::{Loader, RetryPolicy, Timer};

/// Resolves immediately and remembers what it was asked to wait.
#[derive(Debug, Default)]
pub struct InstantTimer {
    sleeps: Mutex<Vec<Duration>>,
}

impl InstantTimer {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Timer for InstantTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        self.sleeps.lock().unwrap_or_else(PoisonError::into_inner).push(duration);
        Box::pin(futures::future::ready(()))
    }
}

/// Sleeps on tokio time; pair with `start_paused = true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// A diagnostics context that records into memory.
pub fn recorded() -> (Diagnostics, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (Diagnostics::new(Vec::new()).with_sink(sink.clone()), sink)
}

/// Loader with the default policy, an instant timer and recorded diagnostics.
pub fn instant_loader(policy: RetryPolicy) -> (Loader, Arc<InstantTimer>, Arc<MemorySink>) {
    let (diagnostics, sink) = recorded();
    let timer = Arc::new(InstantTimer::default());
    (Loader::new(policy, timer.clone(), diagnostics), timer, sink)
}

/// Module source that fails a fixed number of times before succeeding.
#[derive(Debug, Clone)]
pub struct Flaky {
    calls: Arc<AtomicU32>,
    failures: u32,
    missing: bool,
}

impl Flaky {
    /// Fails `failures` times with a fetch error, then succeeds.
    pub fn new(failures: u32) -> Self {
        Self { calls: Arc::new(AtomicU32::new(0)), failures, missing: false }
    }

    /// Never succeeds.
    pub fn always() -> Self {
        Self::new(u32::MAX)
    }

    /// Never succeeds, with a non-transient error.
    pub fn missing() -> Self {
        Self { missing: true, ..Self::new(u32::MAX) }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call(&self, module: &'static str) -> impl Future<Output = Result<&'static str, LoadError>> + use<> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let failures = self.failures;
        let missing = self.missing;
        async move {
            if n > failures {
                Ok(module)
            } else if missing {
                Err(LoadError::not_found(module))
            } else {
                Err(LoadError::fetch(module, format!("attempt {n} failed")))
            }
        }
    }
}
