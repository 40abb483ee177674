//! Coach management.

use leptos::prelude::*;

pub fn view() -> AnyView {
    view! {
        <div class="admin-page admin-page--coaches">
            <h1>"Тренеры"</h1>
            <p>"Управление тренерским штабом."</p>
        </div>
    }
    .into_any()
}
