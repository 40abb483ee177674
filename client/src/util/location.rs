//! Reading and reloading the browser location.

use shell::Location;

/// The in-app location from `window.location.hash`.
///
/// Outside the browser this is always the site root.
pub fn current() -> Location {
    #[cfg(feature = "csr")]
    {
        web_sys::window()
            .and_then(|window| window.location().hash().ok())
            .map_or_else(Location::root, |hash| Location::from_hash(&hash))
    }
    #[cfg(not(feature = "csr"))]
    {
        Location::root()
    }
}

/// Reload the whole application.
pub fn reload() {
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(error) = window.location().reload() {
                log::error!("page reload failed: {error:?}");
            }
        }
    }
}
