use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"Page not found"</h1>
            <p>"The page you asked for does not exist."</p>
            <a href="/">"Back to start"</a>
        </div>
    }
}
