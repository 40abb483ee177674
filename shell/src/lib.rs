//! Navigation shell core for the team site.
//!
//! This crate owns everything between "the URL changed" and "a page view is
//! ready to mount": the route table, hash location parsing, the resilient
//! page-module loader, per-route error boundaries and the diagnostics context
//! they report into. It has no UI framework dependency; the `client` crate
//! renders what this crate decides.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` parses `window.location.hash` into a [`Location`], hands it to a
//! [`Navigator`], and renders each [`Outlet`] of the resulting [`Activation`]
//! behind an error boundary and a suspension point. Each outlet loads its
//! page through a [`Deferred`] handle, which retries through a [`Loader`].

pub mod boundary;
pub mod config;
pub mod deferred;
pub mod diagnostics;
pub mod error;
pub mod fallback;
pub mod loader;
pub mod location;
pub mod navigator;
pub mod route;
pub mod site;

#[cfg(test)]
mod test_support;

pub use boundary::{BoundaryState, CaughtError, ErrorBoundary, FallbackView, RecoveryAction};
pub use config::ShellConfig;
pub use deferred::{Deferred, HandleState, LoadClaim, LoadTicket};
pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, MemorySink, TracingSink};
pub use error::{LoadError, RenderError, RouteTableError, ShellError};
pub use fallback::Placeholder;
pub use loader::{Loader, RetryOn, RetryPolicy, Timer};
pub use location::{Location, href};
pub use navigator::{Activation, ModuleRegistry, Navigator, Outlet};
pub use route::{Params, RouteEntry, RouteKey, RouteMatch, RouteTable};
pub use site::Page;
