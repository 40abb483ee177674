//! Forwarding uncaught browser errors to the diagnostics context.
//!
//! The listeners are attached once, before the first render, and stay for the
//! life of the page.

#[cfg(feature = "csr")]
use shell::Diagnostics;

/// Attach `error` and `unhandledrejection` listeners to `window`.
#[cfg(feature = "csr")]
pub fn install_window_listeners(diagnostics: &Diagnostics) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        diagnostics.uncaught_error("no window to attach error listeners to");
        return;
    };

    let sink = diagnostics.clone();
    let on_error = Closure::<dyn Fn(web_sys::ErrorEvent)>::new(move |event: web_sys::ErrorEvent| {
        sink.uncaught_error(event.message());
    });
    if let Err(error) = window.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref()) {
        log::error!("failed to attach error listener: {error:?}");
    }
    on_error.forget();

    let sink = diagnostics.clone();
    let on_rejection =
        Closure::<dyn Fn(web_sys::PromiseRejectionEvent)>::new(move |event: web_sys::PromiseRejectionEvent| {
            sink.unhandled_rejection(describe(&event.reason()));
        });
    if let Err(error) =
        window.add_event_listener_with_callback("unhandledrejection", on_rejection.as_ref().unchecked_ref())
    {
        log::error!("failed to attach unhandledrejection listener: {error:?}");
    }
    on_rejection.forget();
}

#[cfg(feature = "csr")]
fn describe(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
