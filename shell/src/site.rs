//! The team site's pages and route table.

use std::future::Future;
use std::sync::Arc;

use crate::config::ShellConfig;
use crate::deferred::Deferred;
use crate::diagnostics::Diagnostics;
use crate::error::{LoadError, RouteTableError, ShellError};
use crate::loader::{Loader, Timer};
use crate::navigator::{ModuleRegistry, Navigator};
use crate::route::{RouteEntry, RouteTable};

/// Every page module the site can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Index,
    Team,
    News,
    Matches,
    Tournaments,
    Media,
    Contacts,
    AdminDashboard,
    AdminHome,
    AdminPlayers,
    AdminCoaches,
    AdminTeams,
    NotFound,
}

impl Page {
    pub const ALL: [Page; 13] = [
        Page::Index,
        Page::Team,
        Page::News,
        Page::Matches,
        Page::Tournaments,
        Page::Media,
        Page::Contacts,
        Page::AdminDashboard,
        Page::AdminHome,
        Page::AdminPlayers,
        Page::AdminCoaches,
        Page::AdminTeams,
        Page::NotFound,
    ];

    /// Module name used in load errors and diagnostics.
    #[must_use]
    pub fn module_name(self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Team => "team",
            Page::News => "news",
            Page::Matches => "matches",
            Page::Tournaments => "tournaments",
            Page::Media => "media",
            Page::Contacts => "contacts",
            Page::AdminDashboard => "admin/dashboard",
            Page::AdminHome => "admin/home",
            Page::AdminPlayers => "admin/players",
            Page::AdminCoaches => "admin/coaches",
            Page::AdminTeams => "admin/teams",
            Page::NotFound => "not-found",
        }
    }
}

/// The site's route table.
///
/// # Errors
///
/// Only fails if the declaration below breaks a table invariant.
pub fn routes() -> Result<RouteTable<Page>, RouteTableError> {
    RouteTable::new(vec![
        RouteEntry::new("/", Page::Index),
        RouteEntry::new("/team", Page::Team),
        RouteEntry::new("/news", Page::News),
        RouteEntry::new("/matches", Page::Matches),
        RouteEntry::new("/tournaments/:id?", Page::Tournaments),
        RouteEntry::new("/media", Page::Media),
        RouteEntry::new("/contacts", Page::Contacts),
        RouteEntry::new("/admin", Page::AdminDashboard).with_children(vec![
            RouteEntry::index(Page::AdminHome),
            RouteEntry::new("players", Page::AdminPlayers),
            RouteEntry::new("coaches", Page::AdminCoaches),
            RouteEntry::new("teams", Page::AdminTeams),
        ]),
        RouteEntry::fallback(Page::NotFound),
    ])
}

/// Wire a navigator over the site table.
///
/// `source` produces a page's module; every page gets its own [`Deferred`]
/// handle around it.
///
/// # Errors
///
/// Returns [`ShellError::Routes`] if the table is invalid.
pub fn navigator<M, F, Fut>(
    config: &ShellConfig,
    diagnostics: Diagnostics,
    timer: Arc<dyn Timer>,
    source: F,
) -> Result<Navigator<Page, M>, ShellError>
where
    M: Clone + 'static,
    F: Fn(Page) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<M, LoadError>> + 'static,
{
    let mut registry = ModuleRegistry::new();
    for page in Page::ALL {
        let source = source.clone();
        registry.register(page, Deferred::new(page.module_name(), move || source(page)));
    }

    let loader = Loader::new(config.retry_policy(), timer, diagnostics);
    Navigator::new(routes()?, registry, loader)
}

#[cfg(test)]
#[path = "site_test.rs"]
mod tests;
