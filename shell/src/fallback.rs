//! Placeholder and fallback texts.
//!
//! The site is Russian-language; these are the strings shown while a page
//! module is in flight and when a route's boundary has failed.

/// Heading of the failed-route view.
pub const FALLBACK_TITLE: &str = "Что-то пошло не так";
/// Label of the full-reload button on the failed-route view.
pub const RELOAD_LABEL: &str = "Перезагрузить страницу";
/// Accessible label of the loading spinner.
pub const LOADING_LABEL: &str = "Загрузка…";

/// The view shown while a suspension point waits for its module.
///
/// Stateless: building one cannot fail and needs nothing from the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub label: &'static str,
}

impl Placeholder {
    #[must_use]
    pub const fn spinner() -> Self {
        Self { label: LOADING_LABEL }
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::spinner()
    }
}
