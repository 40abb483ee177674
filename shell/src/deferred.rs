//! Deferred component handles: one cached, cancellable load per page module.
//!
//! DESIGN
//! ======
//! A [`Deferred`] starts *unresolved*. The first [`Deferred::begin`] makes the
//! caller the leader of a new load generation; later callers join it as
//! followers and receive the same result, so attempts never overlap. The
//! leader settles the handle: *resolved* and *failed* are terminal and
//! cached, a cancelled load returns the handle to *unresolved*.
//!
//! Settlement is first-writer-wins per generation. A leader from an older,
//! abandoned generation that finishes late is ignored.
//!
//! Every ticket of a generation carries a [`LoadClaim`]. Releasing a claim
//! withdraws one caller's interest; the load is aborted only when the last
//! claim of its generation is released.
//!
//! CONCURRENCY
//! ===========
//! Loads run as local futures on the UI event loop. The slot sits behind a
//! mutex only so handles are `Send + Sync` for the UI's reactive context; the
//! lock is never held across an await.

use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{AbortHandle, Abortable, Aborted, LocalBoxFuture};
use tracing::debug;

use crate::error::LoadError;
use crate::loader::Loader;

type Source<M> = Arc<dyn Fn() -> LocalBoxFuture<'static, Result<M, LoadError>> + Send + Sync>;
type Waiter<M> = oneshot::Sender<Result<M, LoadError>>;

/// Observable state of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Unresolved,
    Loading,
    Resolved,
    Failed,
}

enum Slot<M> {
    Unresolved,
    Loading { generation: u64, abort: AbortHandle, waiters: Vec<Waiter<M>>, claims: usize },
    Resolved(M),
    Failed(LoadError),
}

struct Inner<M> {
    name: String,
    source: Source<M>,
    slot: Mutex<Slot<M>>,
    generations: AtomicU64,
    attempts: Arc<AtomicU32>,
}

/// Loadable, cacheable reference to a page module.
pub struct Deferred<M> {
    inner: Arc<Inner<M>>,
}

impl<M> Clone for Deferred<M> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<M> std::fmt::Debug for Deferred<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred").field("name", &self.inner.name).finish_non_exhaustive()
    }
}

impl<M: Clone + 'static> Deferred<M> {
    /// Wrap a module source. Nothing runs until the first [`Deferred::begin`].
    pub fn new<F, Fut>(name: impl Into<String>, source: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<M, LoadError>> + 'static,
    {
        let source: Source<M> = Arc::new(move || source().boxed_local());
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                source,
                slot: Mutex::new(Slot::Unresolved),
                generations: AtomicU64::new(0),
                attempts: Arc::new(AtomicU32::new(0)),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// How many times the module source has been invoked.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.inner.attempts.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn state(&self) -> HandleState {
        match &*self.lock() {
            Slot::Unresolved => HandleState::Unresolved,
            Slot::Loading { abort, .. } if abort.is_aborted() => HandleState::Unresolved,
            Slot::Loading { .. } => HandleState::Loading,
            Slot::Resolved(_) => HandleState::Resolved,
            Slot::Failed(_) => HandleState::Failed,
        }
    }

    /// The cached module, once resolved.
    #[must_use]
    pub fn resolved(&self) -> Option<M> {
        match &*self.lock() {
            Slot::Resolved(module) => Some(module.clone()),
            _ => None,
        }
    }

    /// The cached terminal error, once failed.
    #[must_use]
    pub fn error(&self) -> Option<LoadError> {
        match &*self.lock() {
            Slot::Failed(error) => Some(error.clone()),
            _ => None,
        }
    }

    /// Whether both values refer to the same handle.
    #[must_use]
    pub fn same_handle(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Request the module.
    ///
    /// Returns a ready ticket for a settled handle, joins an in-flight load,
    /// or starts a new load generation driven by the returned ticket.
    pub fn begin(&self, loader: &Loader) -> LoadTicket<M> {
        let mut slot = self.lock();
        match &mut *slot {
            Slot::Resolved(module) => return LoadTicket::ready(self.name(), Ok(module.clone())),
            Slot::Failed(error) => return LoadTicket::ready(self.name(), Err(error.clone())),
            Slot::Loading { generation, abort, waiters, claims } if !abort.is_aborted() => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                *claims += 1;
                return LoadTicket {
                    module: self.name().to_owned(),
                    abort: Some(abort.clone()),
                    claim: Some(LoadClaim { handle: self.clone(), generation: *generation }),
                    kind: TicketKind::Follower(rx),
                };
            }
            Slot::Unresolved | Slot::Loading { .. } => {}
        }

        let generation = self.inner.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let (abort, registration) = AbortHandle::new_pair();
        // EDGE: waiters of an aborted generation are dropped here and observe cancellation.
        *slot = Slot::Loading { generation, abort: abort.clone(), waiters: Vec::new(), claims: 1 };
        drop(slot);

        let future = Abortable::new(self.run(loader.clone()), registration).boxed_local();
        LoadTicket {
            module: self.name().to_owned(),
            abort: Some(abort),
            claim: Some(LoadClaim { handle: self.clone(), generation }),
            kind: TicketKind::Leader {
                guard: SettleGuard { handle: self.clone(), generation, settled: false },
                future,
            },
        }
    }

    fn run(&self, loader: Loader) -> LocalBoxFuture<'static, Result<M, LoadError>> {
        let name = self.inner.name.clone();
        let source = Arc::clone(&self.inner.source);
        let attempts = Arc::clone(&self.inner.attempts);
        async move {
            loader
                .load_with_retry(&name, || {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    source()
                })
                .await
        }
        .boxed_local()
    }

    fn settle(&self, generation: u64, result: &Result<M, LoadError>) {
        let waiters = {
            let mut slot = self.lock();
            let current = matches!(&*slot, Slot::Loading { generation: g, .. } if *g == generation);
            if !current {
                debug!(module = %self.inner.name, generation, "ignoring settlement of abandoned load");
                return;
            }
            let next = match result {
                Ok(module) => Slot::Resolved(module.clone()),
                Err(error) if error.is_cancelled() => Slot::Unresolved,
                Err(error) => Slot::Failed(error.clone()),
            };
            match std::mem::replace(&mut *slot, next) {
                Slot::Loading { waiters, .. } => waiters,
                _ => Vec::new(),
            }
        };

        for waiter in waiters {
            if waiter.send(result.clone()).is_err() {
                debug!(module = %self.inner.name, "load waiter went away before settlement");
            }
        }
    }

    fn release(&self, generation: u64) {
        let mut slot = self.lock();
        if let Slot::Loading { generation: g, abort, claims, .. } = &mut *slot {
            if *g == generation {
                *claims = claims.saturating_sub(1);
                if *claims == 0 {
                    debug!(module = %self.inner.name, generation, "last claim released, aborting load");
                    abort.abort();
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<M>> {
        self.inner.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// TICKET
// =============================================================================

/// One caller's claim on a handle's module.
pub struct LoadTicket<M: Clone + 'static> {
    module: String,
    abort: Option<AbortHandle>,
    claim: Option<LoadClaim<M>>,
    kind: TicketKind<M>,
}

/// One caller's interest in an in-flight load generation.
pub struct LoadClaim<M: Clone + 'static> {
    handle: Deferred<M>,
    generation: u64,
}

impl<M: Clone + 'static> LoadClaim<M> {
    /// Withdraw this interest. Aborts the load if no other claim remains.
    pub fn release(self) {
        self.handle.release(self.generation);
    }
}

impl<M: Clone + 'static> std::fmt::Debug for LoadClaim<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadClaim").field("module", &self.handle.name()).field("generation", &self.generation).finish()
    }
}

enum TicketKind<M: Clone + 'static> {
    Ready(Result<M, LoadError>),
    Follower(oneshot::Receiver<Result<M, LoadError>>),
    Leader {
        guard: SettleGuard<M>,
        future: LocalBoxFuture<'static, Result<Result<M, LoadError>, Aborted>>,
    },
}

impl<M: Clone + 'static> LoadTicket<M> {
    fn ready(module: &str, result: Result<M, LoadError>) -> Self {
        Self { module: module.to_owned(), abort: None, claim: None, kind: TicketKind::Ready(result) }
    }

    /// Whether the result is already known.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.kind, TicketKind::Ready(_))
    }

    /// Whether this ticket drives the load.
    #[must_use]
    pub fn is_leader(&self) -> bool {
        matches!(self.kind, TicketKind::Leader { .. })
    }

    /// Handle that cancels the in-flight load this ticket belongs to.
    #[must_use]
    pub fn abort_handle(&self) -> Option<AbortHandle> {
        self.abort.clone()
    }

    /// Take this ticket's claim on the load. `None` once taken, or when the
    /// result was already known.
    pub fn take_claim(&mut self) -> Option<LoadClaim<M>> {
        self.claim.take()
    }

    /// Abort the load outright, whatever other claims remain.
    pub fn cancel(&self) {
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    /// Wait for the module.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`LoadError`], or [`LoadError::Cancelled`] when the
    /// load was abandoned.
    pub async fn resolve(self) -> Result<M, LoadError> {
        match self.kind {
            TicketKind::Ready(result) => result,
            TicketKind::Follower(rx) => match rx.await {
                Ok(result) => result,
                Err(_) => Err(LoadError::cancelled(self.module)),
            },
            TicketKind::Leader { mut guard, future } => {
                let result = match future.await {
                    Ok(result) => result,
                    Err(Aborted) => Err(LoadError::cancelled(self.module)),
                };
                guard.settle(&result);
                result
            }
        }
    }
}

/// Settles the leader's generation, as cancelled if the ticket is dropped first.
struct SettleGuard<M: Clone + 'static> {
    handle: Deferred<M>,
    generation: u64,
    settled: bool,
}

impl<M: Clone + 'static> SettleGuard<M> {
    fn settle(&mut self, result: &Result<M, LoadError>) {
        self.handle.settle(self.generation, result);
        self.settled = true;
    }
}

impl<M: Clone + 'static> Drop for SettleGuard<M> {
    fn drop(&mut self) {
        if !self.settled {
            let cancelled = Err(LoadError::cancelled(self.handle.name()));
            self.handle.settle(self.generation, &cancelled);
        }
    }
}

#[cfg(test)]
#[path = "deferred_test.rs"]
mod tests;
