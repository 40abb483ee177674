//! Player management.

use leptos::prelude::*;

pub fn view() -> AnyView {
    view! {
        <div class="admin-page admin-page--players">
            <h1>"Игроки"</h1>
            <p>"Управление составом игроков."</p>
        </div>
    }
    .into_any()
}
