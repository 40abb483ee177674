//! # client
//!
//! Leptos + WASM frontend for the team site.
//!
//! This crate renders what the `shell` crate decides: the site navigation,
//! one route slot per mounted level, the loading placeholder and the failed
//! route fallback. Built with `--features csr` it is the browser entry
//! point; without it the crate builds natively for tests.

pub mod app;
pub mod components;
pub mod pages;
pub mod util;

pub use app::App;

#[cfg(feature = "csr")]
use shell::{Diagnostics, ShellConfig, ShellError};

/// Mount the application into the element with id `config.mount_id`.
///
/// # Errors
///
/// Returns [`ShellError::MissingMountPoint`] when the document has no such
/// element, or the navigator wiring error.
#[cfg(feature = "csr")]
pub fn mount(config: &ShellConfig, diagnostics: Diagnostics) -> Result<(), ShellError> {
    use leptos::prelude::*;
    use wasm_bindgen::JsCast;

    let root = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(&config.mount_id))
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or_else(|| ShellError::MissingMountPoint { id: config.mount_id.clone() })?;

    let navigator = app::navigator(config, diagnostics)?;
    leptos::mount::mount_to(root, move || view! { <App navigator/> }).forget();
    Ok(())
}

/// Browser entry point.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }

    let diagnostics = Diagnostics::tracing();
    util::diagnostics::install_window_listeners(&diagnostics);

    let config = match ShellConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            diagnostics.uncaught_error(error.to_string());
            ShellConfig::default()
        }
    };

    if let Err(error) = mount(&config, diagnostics.clone()) {
        diagnostics.uncaught_error(error.to_string());
    }
}
