//! Tournaments list, or one tournament when the location carries an id.

use leptos::prelude::*;

use crate::app::RouteParams;

pub fn view() -> AnyView {
    let RouteParams(params) = expect_context::<RouteParams>();
    let selected = move || params.with(|params| params.get("id").map(str::to_owned));

    view! {
        <section class="page page--tournaments">
            <h1>"Турниры"</h1>
            {move || match selected() {
                Some(id) => view! { <p class="page-tournaments__selected">"Турнир №" {id}</p> }.into_any(),
                None => view! { <p>"Все турниры сезона."</p> }.into_any(),
            }}
        </section>
    }
    .into_any()
}
