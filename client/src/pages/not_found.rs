//! Catch-all page for unknown locations.

use leptos::prelude::*;
use shell::href;

pub fn view() -> AnyView {
    view! {
        <section class="page page--not-found">
            <h1>"404"</h1>
            <p>"Страница не найдена."</p>
            <a class="btn" href=href("/")>"На главную"</a>
        </section>
    }
    .into_any()
}
