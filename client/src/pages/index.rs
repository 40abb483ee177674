//! Home page.

use leptos::prelude::*;
use shell::href;

pub fn view() -> AnyView {
    view! {
        <section class="page page--index">
            <h1>"Добро пожаловать"</h1>
            <p>"Официальный сайт команды: состав, новости, расписание матчей и турниры."</p>
            <div class="page-index__links">
                <a class="btn btn--primary" href=href("/matches")>"Ближайшие матчи"</a>
                <a class="btn" href=href("/news")>"Последние новости"</a>
            </div>
        </section>
    }
    .into_any()
}
