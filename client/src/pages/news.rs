//! Club news.

use leptos::prelude::*;

pub fn view() -> AnyView {
    view! {
        <section class="page page--news">
            <h1>"Новости"</h1>
            <p>"Новости клуба и отчёты о матчах."</p>
        </section>
    }
    .into_any()
}
