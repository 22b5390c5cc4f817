//! Session state: auth token, role, decoded claims, and dark-mode flag.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session is the single source of truth for "who is logged in". The
//! route guard reads it, the HTTP client follows its token, and the document
//! follows its dark-mode flag. Persistence goes through [`KeyValueStore`] so
//! a page reload restores the same session.
//!
//! DESIGN
//! ======
//! All mutation goes through the entry points on [`SessionStore`]. Each one
//! updates memory, writes storage where applicable, then synchronously
//! notifies subscribers with the new snapshot. Subscribers receive a clone,
//! so they may read or mutate the store again without borrow conflicts.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;

use crate::util::jwt::{self, TokenClaims};
use crate::util::storage::{
    ACCESS_TOKEN_KEY, DARK_MODE_KEY, KeyValueStore, SharedStore, USER_ROLE_KEY, bool_to_stored,
    get_non_empty,
};

/// Snapshot of the current user's authentication and preference state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    role: Option<String>,
    dark_mode: bool,
    token_data: Option<TokenClaims>,
}

impl Session {
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The user's single role. The backend issues exactly one role per
    /// account; routes may accept several.
    #[must_use]
    pub fn user_role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// `user_id` claim of the decoded token.
    #[must_use]
    pub fn user_id(&self) -> Option<&Value> {
        self.token_data.as_ref().and_then(TokenClaims::user_id)
    }

    #[must_use]
    pub fn token_data(&self) -> Option<&TokenClaims> {
        self.token_data.as_ref()
    }

    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    fn set_auth_fields(&mut self, token: String, role: String) {
        self.token_data = decode_quietly(&token);
        self.token = Some(token);
        self.role = Some(role);
    }

    fn clear_auth_fields(&mut self) {
        self.token = None;
        self.role = None;
        self.token_data = None;
    }
}

/// What kind of mutation produced a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    AuthSet,
    AuthCleared,
    AuthRehydrated,
    DarkModeChanged,
}

impl SessionEvent {
    /// Whether the mutation wrote a new token to storage.
    ///
    /// Rehydration only reads storage, so it is excluded.
    #[must_use]
    pub fn persists_auth(self) -> bool {
        matches!(self, Self::AuthSet | Self::AuthCleared)
    }
}

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&Session, SessionEvent)>;

/// Owner of the session and its persistence.
pub struct SessionStore {
    state: RefCell<Session>,
    storage: SharedStore,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.state.borrow().is_authenticated())
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Build the initial session from storage.
    ///
    /// Token and role are read independently here; [`Self::rehydrate_auth`]
    /// is the stricter path that requires both.
    #[must_use]
    pub fn new(storage: SharedStore) -> Self {
        let token = get_non_empty(storage.as_ref(), ACCESS_TOKEN_KEY);
        let role = get_non_empty(storage.as_ref(), USER_ROLE_KEY);
        let dark_mode = storage.get(DARK_MODE_KEY).as_deref() == Some("true");
        let token_data = token.as_deref().and_then(decode_quietly);
        log::debug!(
            "session loaded: authenticated={} role={role:?} dark_mode={dark_mode}",
            token.is_some()
        );
        Self {
            state: RefCell::new(Session {
                token,
                role,
                dark_mode,
                token_data,
            }),
            storage,
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Clone of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Borrow the current session for a read.
    pub fn with<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&self.state.borrow())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.with(Session::is_authenticated)
    }

    #[must_use]
    pub fn user_role(&self) -> Option<String> {
        self.with(|s| s.user_role().map(str::to_owned))
    }

    #[must_use]
    pub fn user_id(&self) -> Option<Value> {
        self.with(|s| s.user_id().cloned())
    }

    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.with(Session::dark_mode)
    }

    /// Store a freshly issued token and role, in memory and in storage.
    ///
    /// A token that does not decode still authenticates the session; only
    /// the derived claims are left empty.
    pub fn set_auth(&self, token: &str, role: &str) {
        self.state
            .borrow_mut()
            .set_auth_fields(token.to_owned(), role.to_owned());
        self.storage.set(ACCESS_TOKEN_KEY, token);
        self.storage.set(USER_ROLE_KEY, role);
        log::debug!("session auth set: role={role}");
        self.notify(SessionEvent::AuthSet);
    }

    /// Forget the token, role, and claims, in memory and in storage.
    pub fn clear_auth(&self) {
        self.state.borrow_mut().clear_auth_fields();
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(USER_ROLE_KEY);
        log::debug!("session auth cleared");
        self.notify(SessionEvent::AuthCleared);
    }

    /// Re-read token and role from storage.
    ///
    /// Both must be present; otherwise the in-memory auth state is cleared.
    /// Storage is left as found.
    pub fn rehydrate_auth(&self) {
        let token = get_non_empty(self.storage.as_ref(), ACCESS_TOKEN_KEY);
        let role = get_non_empty(self.storage.as_ref(), USER_ROLE_KEY);
        {
            let mut state = self.state.borrow_mut();
            match (token, role) {
                (Some(token), Some(role)) => state.set_auth_fields(token, role),
                _ => state.clear_auth_fields(),
            }
        }
        log::debug!(
            "session rehydrated: authenticated={}",
            self.is_authenticated()
        );
        self.notify(SessionEvent::AuthRehydrated);
    }

    /// Flip the dark-mode flag, persist it, and return the new value.
    pub fn toggle_dark_mode(&self) -> bool {
        self.set_dark_mode(!self.dark_mode())
    }

    /// Set and persist the dark-mode flag, returning it.
    pub fn set_dark_mode(&self, value: bool) -> bool {
        self.state.borrow_mut().dark_mode = value;
        self.storage.set(DARK_MODE_KEY, bool_to_stored(value));
        self.notify(SessionEvent::DarkModeChanged);
        value
    }

    /// Record a successful login.
    pub fn login(&self, token: &str, role: &str) {
        log::info!("login: role={role}");
        self.set_auth(token, role);
    }

    pub fn logout(&self) {
        log::info!("logout");
        self.clear_auth();
    }

    /// Register `listener` to run after every mutation.
    pub fn subscribe(&self, listener: impl Fn(&Session, SessionEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn notify(&self, event: SessionEvent) {
        let snapshot = self.snapshot();
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&snapshot, event);
        }
    }
}

fn decode_quietly(token: &str) -> Option<TokenClaims> {
    match jwt::decode(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            log::debug!("token claims unavailable: {e}");
            None
        }
    }
}
