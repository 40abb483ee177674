//! Admin landing screen.

use leptos::prelude::*;

pub fn view() -> AnyView {
    view! {
        <div class="admin-page admin-page--home">
            <h1>"Обзор"</h1>
            <p>"Сводка по составу, тренерам и командам."</p>
        </div>
    }
    .into_any()
}
