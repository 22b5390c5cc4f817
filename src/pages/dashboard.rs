//! Role dashboards and the AI assistant landing page.
//!
//! All four protected pages share one layout: a header with the signed-in
//! user, the theme toggle and a logout button. The user record is fetched
//! once per mount from `GET /users/me`; the role shown before it arrives
//! comes from the session.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppHandle;
use crate::components::theme_toggle::ThemeToggle;
use crate::net::api;
use crate::net::http::ApiError;
use crate::net::types::User;
use crate::router::LOGIN_PATH;
use crate::router::routes::Page;
use crate::state::session::Session;

/// Profile fetch lifecycle.
#[derive(Clone, Debug, PartialEq)]
enum Profile {
    Loading,
    Loaded(User),
    Failed(String),
}

/// Line under the page heading.
fn welcome_line(user: Option<&User>, role: Option<&str>) -> String {
    match (user, role) {
        (Some(user), _) => format!("Welcome, {} ({})", user.display_name(), user.role),
        (None, Some(role)) if !role.is_empty() => format!("Signed in as {role}"),
        _ => "Signed in".to_owned(),
    }
}

fn profile_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { status: 401, .. } => {
            "Your session has expired. Sign in again.".to_owned()
        }
        other => format!("Could not load your profile: {other}"),
    }
}

#[component]
pub fn DashboardPage(page: Page) -> impl IntoView {
    let app = expect_context::<AppHandle>();
    let session = expect_context::<RwSignal<Session>>();
    let navigate = use_navigate();

    let profile = RwSignal::new(Profile::Loading);
    let http = app.with_value(|ctx| ctx.http.clone());
    leptos::task::spawn_local(async move {
        let next = match api::fetch_me(&http).await {
            Ok(user) => Profile::Loaded(user),
            Err(e) => {
                log::warn!("profile fetch failed: {e}");
                Profile::Failed(profile_error_message(&e))
            }
        };
        profile.set(next);
    });

    let on_logout = move |_| {
        app.with_value(|ctx| ctx.session.logout());
        navigate(LOGIN_PATH, NavigateOptions::default());
    };

    let welcome = move || {
        let role = session.with(|s| s.user_role().map(str::to_owned));
        profile.with(|p| match p {
            Profile::Loaded(user) => welcome_line(Some(user), role.as_deref()),
            _ => welcome_line(None, role.as_deref()),
        })
    };

    let status = move || match profile.get() {
        Profile::Loading => Some("Loading profile...".to_owned()),
        Profile::Failed(msg) => Some(msg),
        Profile::Loaded(_) => None,
    };

    view! {
        <div class="dashboard">
            <header class="dashboard__header">
                <h1>{page.title()}</h1>
                <div class="dashboard__actions">
                    <ThemeToggle/>
                    <button class="dashboard__logout" on:click=on_logout>"Log out"</button>
                </div>
            </header>
            <p class="dashboard__welcome">{welcome}</p>
            {move || status().map(|msg| view! { <p class="dashboard__status">{msg}</p> })}
            <nav class="dashboard__nav">
                <Show when=move || page != Page::AiAssistant>
                    <a href="/ai-assistant">"AI assistant"</a>
                </Show>
            </nav>
        </div>
    }
}
