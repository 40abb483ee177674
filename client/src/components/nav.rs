//! Site-wide navigation bar.

use leptos::prelude::*;
use shell::href;

/// Public sections, as (path, label).
pub const LINKS: [(&str, &str); 7] = [
    ("/", "Главная"),
    ("/team", "Команда"),
    ("/news", "Новости"),
    ("/matches", "Матчи"),
    ("/tournaments", "Турниры"),
    ("/media", "Медиа"),
    ("/contacts", "Контакты"),
];

#[component]
pub fn SiteNav() -> impl IntoView {
    view! {
        <header class="site-nav">
            <nav class="site-nav__links">
                {LINKS
                    .into_iter()
                    .map(|(path, label)| view! { <a class="site-nav__link" href=href(path)>{label}</a> })
                    .collect::<Vec<_>>()}
            </nav>
        </header>
    }
}

#[cfg(test)]
#[path = "nav_test.rs"]
mod tests;
