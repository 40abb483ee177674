//! Team roster.

use leptos::prelude::*;

pub fn view() -> AnyView {
    view! {
        <section class="page page--team">
            <h1>"Команда"</h1>
            <p>"Игроки и тренерский штаб."</p>
        </section>
    }
    .into_any()
}
