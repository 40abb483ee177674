//! Admin layout: section navigation around the nested admin screen.

use leptos::prelude::*;
use shell::href;

use crate::app::ChildOutlet;

/// Section links, as (path, label).
pub const SECTIONS: [(&str, &str); 4] = [
    ("/admin", "Обзор"),
    ("/admin/players", "Игроки"),
    ("/admin/coaches", "Тренеры"),
    ("/admin/teams", "Команды"),
];

pub fn view() -> AnyView {
    view! {
        <div class="admin-dashboard">
            <aside class="admin-dashboard__sidebar">
                <h2>"Администрирование"</h2>
                <nav class="admin-dashboard__nav">
                    {SECTIONS
                        .into_iter()
                        .map(|(path, label)| view! { <a class="admin-dashboard__link" href=href(path)>{label}</a> })
                        .collect::<Vec<_>>()}
                </nav>
            </aside>
            <section class="admin-dashboard__content">
                <ChildOutlet/>
            </section>
        </div>
    }
    .into_any()
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
