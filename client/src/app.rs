//! Root application component and the route slots it renders.
//!
//! ARCHITECTURE
//! ============
//! `App` owns the [`Navigator`] and re-navigates on every `hashchange`. The
//! resulting outlets live in a signal; each nesting depth is rendered by a
//! `Level` that only re-renders when the outlet at its depth is replaced, so
//! levels kept by the navigator keep their view, boundary and pending load.
//!
//! Every level renders through `RouteSlot`: an error boundary around a
//! suspension point around the page module's resource.

use std::sync::{Arc, Mutex, PoisonError};

use leptos::error::Errors;
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use shell::{FallbackView, Navigator, Outlet, Page, Params, Placeholder, RenderError, ShellConfig, ShellError};

use crate::components::nav::SiteNav;
use crate::pages::{self, PageView};
use crate::util::{location, timer::BrowserTimer};

pub type SiteNavigator = Navigator<Page, PageView>;
pub type SiteOutlet = Outlet<Page, PageView>;

/// Outlets of the current activation, outermost first.
#[derive(Clone, Copy)]
struct ActiveOutlets(RwSignal<Vec<SiteOutlet>>);

/// Depth of the enclosing route slot.
#[derive(Clone, Copy)]
struct OutletDepth(usize);

/// Parameters captured by the current location.
#[derive(Clone, Copy)]
pub struct RouteParams(pub RwSignal<Params>);

/// An outlet compared by identity, so a kept level is not re-rendered.
#[derive(Clone)]
struct Mounted(SiteOutlet);

impl PartialEq for Mounted {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_outlet(&other.0)
    }
}

/// Wire the site navigator with the browser timer and the page modules.
///
/// # Errors
///
/// Returns a [`ShellError`] if the route table or module registry is invalid.
pub fn navigator(config: &ShellConfig, diagnostics: shell::Diagnostics) -> Result<SiteNavigator, ShellError> {
    shell::site::navigator(config, diagnostics, Arc::new(BrowserTimer), pages::load)
}

/// Root application component.
#[component]
pub fn App(navigator: SiteNavigator) -> impl IntoView {
    provide_meta_context();

    let navigator = Arc::new(Mutex::new(navigator));
    let initial = navigator.lock().unwrap_or_else(PoisonError::into_inner).navigate(&location::current());

    let outlets = RwSignal::new(initial.outlets().to_vec());
    let params = RwSignal::new(initial.params().clone());
    provide_context(ActiveOutlets(outlets));
    provide_context(RouteParams(params));

    let hashchange = window_event_listener(leptos::ev::hashchange, move |_| {
        let activation = navigator.lock().unwrap_or_else(PoisonError::into_inner).navigate(&location::current());
        outlets.set(activation.outlets().to_vec());
        params.set(activation.params().clone());
    });
    on_cleanup(move || hashchange.remove());

    view! {
        <Title text="ФК Команда"/>
        <SiteNav/>
        <main class="site-main">
            <Level depth=0/>
        </main>
    }
}

/// Renders the outlet at `depth`, if the activation has one.
#[component]
fn Level(depth: usize) -> impl IntoView {
    let ActiveOutlets(outlets) = expect_context::<ActiveOutlets>();
    let mounted = Memo::new(move |_| outlets.with(|outlets| outlets.get(depth).cloned().map(Mounted)));

    move || mounted.get().map(|Mounted(outlet)| view! { <RouteSlot outlet depth/> })
}

/// Renders the next nesting level inside a layout page.
#[component]
pub fn ChildOutlet() -> impl IntoView {
    let depth = use_context::<OutletDepth>().map_or(0, |OutletDepth(depth)| depth + 1);
    view! { <Level depth/> }
}

#[component]
fn RouteSlot(outlet: SiteOutlet, depth: usize) -> impl IntoView {
    provide_context(OutletDepth(depth));

    let boundary = outlet.boundary().clone();
    let module = LocalResource::new(move || outlet.load());

    view! {
        <ErrorBoundary fallback=move |errors| view! { <ErrorFallback boundary=boundary.clone() errors/> }>
            <Suspense fallback=|| view! { <PageLoading/> }>
                {move || module.get().map(|loaded| loaded.map(|page: PageView| page()))}
            </Suspense>
        </ErrorBoundary>
    }
}

/// Spinner shown while a page module is in flight.
#[component]
pub fn PageLoading() -> impl IntoView {
    let placeholder = Placeholder::spinner();
    view! {
        <div class="page-loading" role="status" aria-label=placeholder.label>
            <div class="page-loading__spinner"></div>
        </div>
    }
}

/// Fallback shown by a failed route boundary.
#[component]
fn ErrorFallback(boundary: shell::ErrorBoundary, errors: ArcRwSignal<Errors>) -> impl IntoView {
    let rendered = errors.with(|errors| errors.iter().map(|(_, error)| error.to_string()).collect::<Vec<_>>().join("; "));
    // Load failures were caught when the load settled; anything else failed while rendering.
    if boundary.is_healthy() {
        boundary.catch(RenderError::new(rendered.clone()));
    }
    let fallback = boundary.fallback().unwrap_or_else(|| FallbackView::for_error(&RenderError::new(rendered).into()));

    view! {
        <div class="error-fallback">
            <div class="error-fallback__card">
                <h2 class="error-fallback__title">{fallback.title}</h2>
                <p class="error-fallback__message">{fallback.message}</p>
                <button class="btn btn--primary" on:click=move |_| location::reload()>
                    {fallback.action.label()}
                </button>
            </div>
        </div>
    }
}
