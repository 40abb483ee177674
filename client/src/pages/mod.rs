//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page exposes `view() -> AnyView`. [`load`] is the module source the
//! navigator's handles load through; pages are linked into the bundle, so a
//! load always succeeds on the first attempt and the retry path only comes
//! into play for sources that can fail.

pub mod admin;
pub mod contacts;
pub mod index;
pub mod matches;
pub mod media;
pub mod news;
pub mod not_found;
pub mod team;
pub mod tournaments;

use std::future::{Ready, ready};

use leptos::prelude::AnyView;
use shell::{LoadError, Page};

/// A loaded page module: renders the page.
pub type PageView = fn() -> AnyView;

/// The view function for `page`.
pub fn view_for(page: Page) -> PageView {
    match page {
        Page::Index => index::view,
        Page::Team => team::view,
        Page::News => news::view,
        Page::Matches => matches::view,
        Page::Tournaments => tournaments::view,
        Page::Media => media::view,
        Page::Contacts => contacts::view,
        Page::AdminDashboard => admin::dashboard::view,
        Page::AdminHome => admin::home::view,
        Page::AdminPlayers => admin::players::view,
        Page::AdminCoaches => admin::coaches::view,
        Page::AdminTeams => admin::teams::view,
        Page::NotFound => not_found::view,
    }
}

/// Module source for the navigator.
pub fn load(page: Page) -> Ready<Result<PageView, LoadError>> {
    ready(Ok(view_for(page)))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
