//! Error isolation boundaries.
//!
//! Every mounted route level owns one [`ErrorBoundary`]. It starts healthy;
//! the first failure caught from its subtree flips it to failed for the rest
//! of its life and the route shows the fallback view instead of its content.
//! Only unmounting and remounting the route (a new instance) makes it healthy
//! again. Every caught failure is reported to the diagnostics context.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{LoadError, RenderError};
use crate::fallback::{FALLBACK_TITLE, RELOAD_LABEL};

/// A failure that reached a boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaughtError {
    /// Module load failed after its retries.
    Load(LoadError),
    /// Page failed while rendering.
    Render(RenderError),
}

impl fmt::Display for CaughtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(error) => write!(f, "{error}"),
            Self::Render(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for CaughtError {}

impl From<LoadError> for CaughtError {
    fn from(error: LoadError) -> Self {
        Self::Load(error)
    }
}

impl From<RenderError> for CaughtError {
    fn from(error: RenderError) -> Self {
        Self::Render(error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    Healthy,
    Failed(CaughtError),
}

/// What the user can do from the fallback view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Reload the whole application; local state may be corrupt.
    ReloadApplication,
}

impl RecoveryAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ReloadApplication => RELOAD_LABEL,
        }
    }
}

/// Content of the fallback view shown by a failed boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackView {
    pub title: &'static str,
    pub message: String,
    pub action: RecoveryAction,
}

impl FallbackView {
    #[must_use]
    pub fn for_error(error: &CaughtError) -> Self {
        Self { title: FALLBACK_TITLE, message: error.to_string(), action: RecoveryAction::ReloadApplication }
    }
}

/// Failure container for one mounted route level.
#[derive(Clone)]
pub struct ErrorBoundary {
    route: Arc<str>,
    state: Arc<Mutex<BoundaryState>>,
    diagnostics: Diagnostics,
}

impl ErrorBoundary {
    pub fn new(route: impl Into<Arc<str>>, diagnostics: Diagnostics) -> Self {
        Self { route: route.into(), state: Arc::new(Mutex::new(BoundaryState::Healthy)), diagnostics }
    }

    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    #[must_use]
    pub fn state(&self) -> BoundaryState {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(*self.lock(), BoundaryState::Healthy)
    }

    /// Record a failure from the subtree.
    ///
    /// Returns `true` if this call moved the boundary from healthy to failed.
    /// A failed boundary keeps its first error.
    pub fn catch(&self, error: impl Into<CaughtError>) -> bool {
        let error = error.into();
        self.diagnostics.record(&Diagnostic::BoundaryCaught { route: self.route.to_string(), error: error.to_string() });

        let mut state = self.lock();
        if matches!(*state, BoundaryState::Healthy) {
            *state = BoundaryState::Failed(error);
            true
        } else {
            false
        }
    }

    /// Pass `Ok` through; send `Err` to [`ErrorBoundary::catch`].
    pub fn guard<T, E: Into<CaughtError>>(&self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.catch(error);
                None
            }
        }
    }

    /// The fallback to render, if the boundary has failed.
    #[must_use]
    pub fn fallback(&self) -> Option<FallbackView> {
        match &*self.lock() {
            BoundaryState::Healthy => None,
            BoundaryState::Failed(error) => Some(FallbackView::for_error(error)),
        }
    }

    /// Whether both values are the same boundary instance.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn lock(&self) -> MutexGuard<'_, BoundaryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ErrorBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorBoundary")
            .field("route", &self.route)
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "boundary_test.rs"]
mod tests;
