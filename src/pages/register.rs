//! Registration page posting a new account to `POST /users/`.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppHandle;
use crate::net::api;
use crate::net::types::NewUser;
use crate::router::LOGIN_PATH;

/// Roles a visitor may pick for themselves.
const SELF_SERVICE_ROLES: [(&str, &str); 3] = [
    ("parent", "Parent"),
    ("class_rep", "Class representative"),
    ("teacher", "Teacher"),
];

#[component]
pub fn RegisterPage() -> impl IntoView {
    let app = expect_context::<AppHandle>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let role = RwSignal::new(SELF_SERVICE_ROLES[0].0.to_owned());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let user = NewUser {
            username: username.get().trim().to_owned(),
            first_name: first_name.get().trim().to_owned(),
            last_name: last_name.get().trim().to_owned(),
            email: email.get().trim().to_owned(),
            role: role.get(),
            password: password.get(),
        };
        if let Err(e) = api::validate_new_user(&user) {
            info.set(e.to_string());
            return;
        }
        busy.set(true);
        info.set("Creating account...".to_owned());

        let http = app.with_value(|ctx| ctx.http.clone());
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::register(&http, &user).await {
                Ok(created) => {
                    log::info!("registered user {}", created.username);
                    navigate(LOGIN_PATH, NavigateOptions::default());
                }
                Err(e) => info.set(format!("Registration failed: {e}")),
            }
            busy.set(false);
        });
    };

    let text_input = move |label: &'static str, kind: &'static str, value: RwSignal<String>| {
        view! {
            <label class="register-form__label">
                {label}
                <input
                    class="login-input"
                    type=kind
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    let role_options = SELF_SERVICE_ROLES
        .iter()
        .map(|(value, label)| view! { <option value=*value>{*label}</option> })
        .collect::<Vec<_>>();

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create account"</h1>
                <form class="register-form" on:submit=on_submit>
                    {text_input("Username", "text", username)}
                    {text_input("First name", "text", first_name)}
                    {text_input("Last name", "text", last_name)}
                    {text_input("Email", "email", email)}
                    <label class="register-form__label">
                        "Role"
                        <select
                            class="login-input"
                            prop:value=move || role.get()
                            on:change=move |ev| role.set(event_target_value(&ev))
                        >
                            {role_options}
                        </select>
                    </label>
                    {text_input("Password", "password", password)}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "Already registered? "
                    <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
