//! Light/dark theme switch bound to the session's dark-mode flag.

#[cfg(test)]
#[path = "theme_toggle_test.rs"]
mod theme_toggle_test;

use leptos::prelude::*;

use crate::app::AppHandle;
use crate::state::session::Session;

fn toggle_label(dark: bool) -> &'static str {
    if dark { "Light mode" } else { "Dark mode" }
}

/// Button flipping dark mode. The session persists the flag and the
/// bootstrap subscription applies it to the document.
#[component]
pub fn ThemeToggle() -> impl IntoView {
    let app = expect_context::<AppHandle>();
    let session = expect_context::<RwSignal<Session>>();

    let on_click = move |_| {
        let enabled = app.with_value(|ctx| ctx.session.toggle_dark_mode());
        log::debug!("dark mode {}", if enabled { "on" } else { "off" });
    };

    view! {
        <button class="theme-toggle" type="button" on:click=on_click>
            {move || toggle_label(session.with(Session::dark_mode))}
        </button>
    }
}
