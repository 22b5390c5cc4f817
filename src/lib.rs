//! # klasstra
//!
//! Leptos + WASM single-page client for the Klasstra school platform.
//!
//! The crate holds the client-side session (token, role, dark mode) with
//! its `localStorage` persistence, a role-aware navigation guard over a
//! static route table, an HTTP client that keeps the bearer header in sync
//! with the session, and the pages built on top of them.
//!
//! Browser bindings are behind the `csr` feature. Without it the same
//! state, routing and API logic compiles natively for tests, with an
//! in-memory store and an HTTP transport that reports `Unavailable`.

pub mod app;
pub mod bootstrap;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod router;
pub mod state;
pub mod util;

/// WASM entry point: logging, configuration, then mount.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use leptos::prelude::*;

    use crate::app::App;
    use crate::config::ClientConfig;

    console_error_panic_hook::set_once();

    let (config, config_error) = match ClientConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => (ClientConfig::default(), Some(e)),
    };
    if console_log::init_with_level(config.log_level).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    if let Some(e) = config_error {
        log::warn!("invalid client configuration, using defaults: {e}");
    }
    log::info!("starting klasstra client against {}", config.api_base_url);

    leptos::mount::mount_to_body(move || view! { <App config=config/> });
}
