//! Error types for loading, rendering, routing and startup.
//!
//! ERROR HANDLING
//! ==============
//! Transient load failures never leave the loader. Terminal load failures and
//! render failures travel to the nearest [`crate::ErrorBoundary`], which is
//! the only recovery point. `Cancelled` marks a load abandoned by navigation
//! and is never shown to the user.

// =============================================================================
// LOAD
// =============================================================================

/// Failure to produce a page module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The module does not exist; retrying cannot help.
    #[error("module `{module}` not found")]
    NotFound { module: String },

    /// Fetching the module failed (network, chunk download, timeout).
    #[error("failed to fetch module `{module}`: {reason}")]
    Fetch { module: String, reason: String },

    /// The load was abandoned because its route is no longer mounted.
    #[error("load of module `{module}` was cancelled")]
    Cancelled { module: String },
}

impl LoadError {
    /// Build a [`LoadError::Fetch`].
    #[must_use]
    pub fn fetch(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch { module: module.into(), reason: reason.into() }
    }

    /// Build a [`LoadError::NotFound`].
    #[must_use]
    pub fn not_found(module: impl Into<String>) -> Self {
        Self::NotFound { module: module.into() }
    }

    /// Build a [`LoadError::Cancelled`].
    #[must_use]
    pub fn cancelled(module: impl Into<String>) -> Self {
        Self::Cancelled { module: module.into() }
    }

    /// Name of the module the error refers to.
    #[must_use]
    pub fn module(&self) -> &str {
        match self {
            Self::NotFound { module }
            | Self::Fetch { module, .. }
            | Self::Cancelled { module } => module,
        }
    }

    /// Whether a later attempt could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

// =============================================================================
// RENDER
// =============================================================================

/// A page failed while producing its view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// The route table violates one of its construction invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteTableError {
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: &'static str },

    #[error("duplicate route pattern `{pattern}` under `{parent}`")]
    DuplicatePath { parent: String, pattern: String },

    #[error("more than one index route under `{parent}`")]
    DuplicateIndex { parent: String },

    #[error("index route under `{parent}` cannot have children")]
    IndexWithChildren { parent: String },

    #[error("route table has no catch-all `*` entry")]
    MissingFallback,

    #[error("route table has more than one catch-all `*` entry")]
    MultipleFallbacks,

    #[error("catch-all `*` entry must be the last top-level route")]
    FallbackNotLast,
}

// =============================================================================
// SHELL
// =============================================================================

/// Fatal startup and wiring errors.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The document has no element to mount the application into.
    #[error("mount point `#{id}` not found")]
    MissingMountPoint { id: String },

    /// A routed page has no registered module.
    #[error("no module registered for page {page}")]
    MissingModule { page: String },

    #[error(transparent)]
    Routes(#[from] RouteTableError),

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),
}
