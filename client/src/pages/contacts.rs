//! Contact details.

use leptos::prelude::*;

pub fn view() -> AnyView {
    view! {
        <section class="page page--contacts">
            <h1>"Контакты"</h1>
            <p>"Как связаться с клубом."</p>
        </section>
    }
    .into_any()
}
