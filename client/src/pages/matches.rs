//! Match schedule and results.

use leptos::prelude::*;

pub fn view() -> AnyView {
    view! {
        <section class="page page--matches">
            <h1>"Матчи"</h1>
            <p>"Расписание и результаты."</p>
        </section>
    }
    .into_any()
}
