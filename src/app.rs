//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Redirect, Router};
use leptos_router::hooks::use_location;

use crate::bootstrap::AppContext;
use crate::config::ClientConfig;
use crate::pages::{
    dashboard::DashboardPage, login::LoginPage, not_found::NotFoundPage, register::RegisterPage,
};
use crate::router::routes::Page;
use crate::state::session::{Session, SessionEvent};
use crate::util::{dark_mode, storage};

/// Context handle to the application wiring. The wiring holds `Rc`s, so it
/// lives in local (non-`Send`) reactive storage.
pub type AppHandle = StoredValue<AppContext, LocalStorage>;

/// Root application component.
///
/// Bootstraps the session, mirrors it into a signal so views re-render on
/// login/logout/theme changes, and hands every browser path to the guard.
#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    provide_meta_context();

    let ctx = AppContext::bootstrap(config, storage::default_store(), dark_mode::apply);
    let session = RwSignal::new(ctx.session.snapshot());
    let mirror = move |snapshot: &Session, _: SessionEvent| session.set(snapshot.clone());
    ctx.session.subscribe(mirror);

    provide_context::<AppHandle>(StoredValue::new_local(ctx));
    provide_context(session);

    view! {
        <Title text="Klasstra"/>

        <Router>
            <Guarded/>
        </Router>
    }
}

/// Resolves the current browser path through the route table and renders
/// the page it settles on.
///
/// The route table owns matching, so case, trailing slashes and unknown
/// paths all go through the same guard. Re-evaluates when the path or the
/// auth part of the session changes. Theme changes do not remount.
#[component]
fn Guarded() -> impl IntoView {
    let app = expect_context::<AppHandle>();
    let session = expect_context::<RwSignal<Session>>();
    let location = use_location();

    let auth = Memo::new(move |_| session.with(auth_key));

    move || {
        auth.track();
        let requested = location.pathname.get();
        match app.with_value(|ctx| ctx.navigate(&requested)) {
            Ok(nav) if nav.redirected => view! { <Redirect path=nav.path/> }.into_any(),
            Ok(nav) => view! {
                <Title text=nav.page.title()/>
                {render_page(nav.page)}
            }
            .into_any(),
            Err(e) => view! { <p class="route-error">{e.to_string()}</p> }.into_any(),
        }
    }
}

/// The session fields navigation depends on.
fn auth_key(session: &Session) -> (Option<String>, Option<String>) {
    let token = session.token().map(str::to_owned);
    (token, session.user_role().map(str::to_owned))
}

fn render_page(page: Page) -> AnyView {
    match page {
        Page::Login => view! { <LoginPage/> }.into_any(),
        Page::Register => view! { <RegisterPage/> }.into_any(),
        Page::TeacherDashboard
        | Page::ParentDashboard
        | Page::AdminDashboard
        | Page::AiAssistant => view! { <DashboardPage page=page/> }.into_any(),
        Page::NotFound => view! { <NotFoundPage/> }.into_any(),
    }
}
