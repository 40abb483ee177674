//! Photo and video gallery.

use leptos::prelude::*;

pub fn view() -> AnyView {
    view! {
        <section class="page page--media">
            <h1>"Медиа"</h1>
            <p>"Фото и видео с матчей и тренировок."</p>
        </section>
    }
    .into_any()
}
