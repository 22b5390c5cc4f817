//! Login page: username/password form against `POST /auth/login`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppHandle;
use crate::components::theme_toggle::ThemeToggle;
use crate::net::api;
use crate::net::http::ApiError;
use crate::router::routes::home_path_for_role;

/// User-facing text for a failed login.
fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Status { status: 401, .. } => "Invalid username or password.".to_owned(),
        ApiError::MissingRole => {
            "This account has no role assigned. Contact your school.".to_owned()
        }
        ApiError::InvalidInput(msg) => msg.clone(),
        ApiError::Network(_) | ApiError::Unavailable => {
            "Could not reach the server. Try again.".to_owned()
        }
        other => format!("Login failed: {other}"),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let app = expect_context::<AppHandle>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let user_value = username.get();
        let pass_value = password.get();
        if let Err(e) = api::validate_login_input(&user_value, &pass_value) {
            info.set(login_error_message(&e));
            return;
        }
        busy.set(true);
        info.set("Signing in...".to_owned());

        let ctx = app.get_value();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::login(&ctx.http, &ctx.session, &user_value, &pass_value).await {
                Ok(creds) => {
                    info.set(String::new());
                    password.set(String::new());
                    navigate(
                        home_path_for_role(Some(&creds.role)),
                        NavigateOptions::default(),
                    );
                }
                Err(e) => info.set(login_error_message(&e)),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Klasstra"</h1>
                <p class="login-card__subtitle">"Sign in to your school account"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username or email"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign in"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "No account yet? "
                    <a href="/register">"Register"</a>
                </p>
                <ThemeToggle/>
            </div>
        </div>
    }
}
