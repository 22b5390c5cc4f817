//! Startup wiring for session, HTTP client, routes, and dark mode.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`AppContext::bootstrap`] is the only place the pieces meet. It
//! subscribes the HTTP client to login and logout and the document applier
//! to dark-mode changes, then rehydrates the session before the first
//! render.
//!
//! Rehydration does not reach the HTTP client. The client already applied
//! the persisted token when it was built, and storage is left as found, so
//! a reload keeps the header even when the role entry is missing.

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod bootstrap_test;

use std::rc::Rc;

use crate::config::ClientConfig;
use crate::net::http::HttpClient;
use crate::router::routes::{Navigation, NavigationError, RouteTable};
use crate::state::session::{SessionEvent, SessionStore};
use crate::util::storage::SharedStore;

/// Everything a page needs, cheap to clone.
#[derive(Clone, Debug)]
pub struct AppContext {
    pub config: ClientConfig,
    pub session: Rc<SessionStore>,
    pub http: HttpClient,
    pub routes: Rc<RouteTable>,
}

impl AppContext {
    /// Wire the application over `storage`.
    ///
    /// `apply_dark_mode` receives the current flag immediately and again on
    /// every dark-mode change.
    pub fn bootstrap(
        config: ClientConfig,
        storage: SharedStore,
        apply_dark_mode: impl Fn(bool) + 'static,
    ) -> Self {
        let session = Rc::new(SessionStore::new(Rc::clone(&storage)));
        let http = HttpClient::new(&config.api_base_url, storage);

        let auth_sync = http.clone();
        session.subscribe(move |snapshot, event| {
            if event.persists_auth() {
                auth_sync.set_auth_token(snapshot.token());
            }
        });

        apply_dark_mode(session.dark_mode());
        session.subscribe(move |snapshot, event| {
            if event == SessionEvent::DarkModeChanged {
                apply_dark_mode(snapshot.dark_mode());
            }
        });

        session.rehydrate_auth();
        log::info!(
            "client ready: api={} authenticated={}",
            config.api_base_url,
            session.is_authenticated()
        );

        Self {
            config,
            session,
            http,
            routes: Rc::new(RouteTable::standard()),
        }
    }

    /// Resolve `path` against the current session.
    ///
    /// # Errors
    ///
    /// Propagates [`NavigationError`] from the route table.
    pub fn navigate(&self, path: &str) -> Result<Navigation, NavigationError> {
        self.session.with(|session| self.routes.navigate(path, session))
    }
}
