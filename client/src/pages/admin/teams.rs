//! Team management.

use leptos::prelude::*;

pub fn view() -> AnyView {
    view! {
        <div class="admin-page admin-page--teams">
            <h1>"Команды"</h1>
            <p>"Управление командами клуба."</p>
        </div>
    }
    .into_any()
}
