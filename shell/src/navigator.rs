//! Turning locations into mounted route levels.
//!
//! DESIGN
//! ======
//! [`Navigator::navigate`] resolves a [`Location`] against the route table
//! and produces an [`Activation`]: one [`Outlet`] per matched level, root
//! first. An outlet bundles the level's page, its module handle and its own
//! [`ErrorBoundary`].
//!
//! Outlets survive navigation while their level stays mounted: a level whose
//! route key and every ancestor key are unchanged keeps its outlet, boundary
//! and in-flight load. Every other outlet of the previous activation is
//! abandoned, which withdraws its claim on the pending load. A load shared
//! with a kept level keeps running; one nobody else wants is cancelled. A
//! level mounted again later gets a new outlet and therefore a new, healthy
//! boundary.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::boundary::ErrorBoundary;
use crate::deferred::{Deferred, LoadClaim, LoadTicket};
use crate::error::{LoadError, RenderError, ShellError};
use crate::loader::Loader;
use crate::location::Location;
use crate::route::{Params, RouteKey, RouteTable};

// =============================================================================
// REGISTRY
// =============================================================================

/// Module handle for every page.
pub struct ModuleRegistry<P, M> {
    modules: HashMap<P, Deferred<M>>,
}

impl<P: Eq + Hash, M: Clone + 'static> ModuleRegistry<P, M> {
    #[must_use]
    pub fn new() -> Self {
        Self { modules: HashMap::new() }
    }

    /// Register the handle for `page`, replacing any earlier one.
    pub fn register(&mut self, page: P, module: Deferred<M>) -> &mut Self {
        self.modules.insert(page, module);
        self
    }

    #[must_use]
    pub fn get(&self, page: &P) -> Option<&Deferred<M>> {
        self.modules.get(page)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<P: Eq + Hash, M: Clone + 'static> Default for ModuleRegistry<P, M> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// OUTLET
// =============================================================================

/// What one outlet holds on its module's in-flight load.
struct Interest<M: Clone + 'static> {
    abandoned: bool,
    claim: Option<LoadClaim<M>>,
}

type SharedInterest<M> = Arc<Mutex<Interest<M>>>;

/// One mounted route level.
pub struct Outlet<P, M: Clone + 'static> {
    key: RouteKey,
    page: P,
    module: Deferred<M>,
    boundary: ErrorBoundary,
    loader: Loader,
    interest: SharedInterest<M>,
}

impl<P: Clone, M: Clone + 'static> Clone for Outlet<P, M> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            page: self.page.clone(),
            module: self.module.clone(),
            boundary: self.boundary.clone(),
            loader: self.loader.clone(),
            interest: Arc::clone(&self.interest),
        }
    }
}

impl<P, M: Clone + 'static> Outlet<P, M> {
    #[must_use]
    pub fn key(&self) -> &RouteKey {
        &self.key
    }

    #[must_use]
    pub fn page(&self) -> &P {
        &self.page
    }

    #[must_use]
    pub fn module(&self) -> &Deferred<M> {
        &self.module
    }

    #[must_use]
    pub fn boundary(&self) -> &ErrorBoundary {
        &self.boundary
    }

    /// Whether two values are the same mounted level.
    #[must_use]
    pub fn same_outlet(&self, other: &Self) -> bool {
        self.boundary.same_instance(&other.boundary)
    }

    /// Load this level's module.
    ///
    /// A terminal failure is caught by the outlet's boundary before it is
    /// returned. Cancellation is returned but not caught. A shared load whose
    /// driver went away is restarted while this outlet is still mounted.
    pub fn load(&self) -> impl Future<Output = Result<M, LoadError>> + use<P, M> {
        let module = self.module.clone();
        let loader = self.loader.clone();
        let interest = Arc::clone(&self.interest);
        let boundary = self.boundary.clone();
        let mut ticket = claim(&module, &loader, &interest);

        async move {
            loop {
                let leader = ticket.is_leader();
                let result = ticket.resolve().await;
                match &result {
                    Err(error) if error.is_cancelled() && !leader && !is_abandoned(&interest) => {
                        debug!(module = %module.name(), "shared load went away, restarting");
                        ticket = claim(&module, &loader, &interest);
                        continue;
                    }
                    Err(error) if !error.is_cancelled() => {
                        boundary.catch(error.clone());
                    }
                    _ => {}
                }
                return result;
            }
        }
    }

    /// Report that the page failed while rendering.
    pub fn report_render_failure(&self, error: RenderError) -> bool {
        self.boundary.catch(error)
    }

    /// Withdraw this level's interest in its in-flight load.
    ///
    /// The load is cancelled unless another mounted level still waits on it.
    pub fn abandon(&self) {
        let claim = {
            let mut interest = self.interest.lock().unwrap_or_else(PoisonError::into_inner);
            interest.abandoned = true;
            interest.claim.take()
        };
        if let Some(claim) = claim {
            claim.release();
        }
    }
}

/// Begin a load and record the ticket's claim as the outlet's interest.
fn claim<M: Clone + 'static>(module: &Deferred<M>, loader: &Loader, interest: &SharedInterest<M>) -> LoadTicket<M> {
    let mut ticket = module.begin(loader);
    if let Some(claim) = ticket.take_claim() {
        let mut interest = interest.lock().unwrap_or_else(PoisonError::into_inner);
        if interest.abandoned {
            drop(interest);
            claim.release();
        } else if let Some(previous) = interest.claim.replace(claim) {
            drop(interest);
            previous.release();
        }
    }
    ticket
}

fn is_abandoned<M: Clone + 'static>(interest: &SharedInterest<M>) -> bool {
    interest.lock().unwrap_or_else(PoisonError::into_inner).abandoned
}

impl<P: fmt::Debug, M: Clone + 'static> fmt::Debug for Outlet<P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outlet")
            .field("key", &self.key)
            .field("page", &self.page)
            .field("boundary", &self.boundary)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ACTIVATION
// =============================================================================

/// The result of one navigation.
pub struct Activation<P, M: Clone + 'static> {
    location: Location,
    outlets: Vec<Outlet<P, M>>,
    params: Params,
    fallback: bool,
}

impl<P: Clone, M: Clone + 'static> Clone for Activation<P, M> {
    fn clone(&self) -> Self {
        Self {
            location: self.location.clone(),
            outlets: self.outlets.clone(),
            params: self.params.clone(),
            fallback: self.fallback,
        }
    }
}

impl<P, M: Clone + 'static> Activation<P, M> {
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Mounted levels, outermost first. Never empty.
    #[must_use]
    pub fn outlets(&self) -> &[Outlet<P, M>] {
        &self.outlets
    }

    pub fn pages(&self) -> impl Iterator<Item = &P> {
        self.outlets.iter().map(Outlet::page)
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Whether the location fell through to the catch-all.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

impl<P: fmt::Debug, M: Clone + 'static> fmt::Debug for Activation<P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("location", &self.location)
            .field("outlets", &self.outlets)
            .field("params", &self.params)
            .field("fallback", &self.fallback)
            .finish()
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Owns the route table, the page modules and the current activation.
pub struct Navigator<P, M: Clone + 'static> {
    table: RouteTable<P>,
    registry: ModuleRegistry<P, M>,
    loader: Loader,
    current: Option<Activation<P, M>>,
}

impl<P, M> Navigator<P, M>
where
    P: Clone + Eq + Hash + fmt::Debug,
    M: Clone + 'static,
{
    /// # Errors
    ///
    /// Returns [`ShellError::MissingModule`] if a page in the table has no
    /// registered module.
    pub fn new(table: RouteTable<P>, registry: ModuleRegistry<P, M>, loader: Loader) -> Result<Self, ShellError> {
        if let Some(page) = table.pages().into_iter().find(|page| registry.get(page).is_none()) {
            return Err(ShellError::MissingModule { page: format!("{page:?}") });
        }
        Ok(Self { table, registry, loader, current: None })
    }

    #[must_use]
    pub fn current(&self) -> Option<&Activation<P, M>> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Mount `location`, keeping unchanged levels and abandoning the rest.
    pub fn navigate(&mut self, location: &Location) -> Activation<P, M> {
        let matched = self.table.resolve(location.path());
        let previous = self.current.take().map(|activation| activation.outlets).unwrap_or_default();

        let mut outlets = Vec::with_capacity(matched.levels().len());
        let mut kept = 0;
        for (depth, level) in matched.levels().iter().enumerate() {
            match previous.get(depth) {
                Some(outlet) if kept == depth && outlet.key == level.key => {
                    outlets.push(outlet.clone());
                    kept += 1;
                }
                _ => outlets.push(self.mount(&level.key, &level.page)),
            }
        }

        for outlet in previous.iter().skip(kept) {
            debug!(route = %outlet.key, "abandoning route level");
            outlet.abandon();
        }

        debug!(path = %location.path(), levels = outlets.len(), kept, fallback = matched.is_fallback(), "navigated");

        let activation = Activation {
            location: location.clone(),
            outlets,
            params: matched.params().clone(),
            fallback: matched.is_fallback(),
        };
        self.current = Some(activation.clone());
        activation
    }

    fn mount(&self, key: &RouteKey, page: &P) -> Outlet<P, M> {
        // Checked in `new`: every page in the table has a module.
        let module = match self.registry.get(page) {
            Some(module) => module.clone(),
            None => Deferred::new(format!("{page:?}"), {
                let name = format!("{page:?}");
                move || std::future::ready(Err(LoadError::not_found(name.clone())))
            }),
        };

        Outlet {
            key: key.clone(),
            page: page.clone(),
            module,
            boundary: ErrorBoundary::new(key.as_str(), self.loader.diagnostics().clone()),
            loader: self.loader.clone(),
            interest: Arc::new(Mutex::new(Interest { abandoned: false, claim: None })),
        }
    }
}

impl<P: fmt::Debug, M: Clone + 'static> fmt::Debug for Navigator<P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator").field("current", &self.current).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "navigator_test.rs"]
mod tests;
