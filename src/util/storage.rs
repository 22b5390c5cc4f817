//! Persistent key-value storage for session values.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store and the HTTP client both persist through this adapter.
//! In the browser (`csr`) it wraps `window.localStorage`; natively and in
//! tests it is an in-memory map with the same semantics.
//!
//! TRADE-OFFS
//! ==========
//! Browser storage can be disabled or full. Those failures are logged and
//! swallowed so the UI degrades to an unauthenticated, light-mode session
//! instead of failing to boot.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Storage key holding the raw bearer token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key holding the user's role string.
pub const USER_ROLE_KEY: &str = "userRole";
/// Storage key holding `"true"` or `"false"`.
pub const DARK_MODE_KEY: &str = "darkMode";

/// String key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Shared handle to the application's storage backend.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// Read `key`, treating an empty string the same as a missing entry.
pub fn get_non_empty(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    store.get(key).filter(|v| !v.is_empty())
}

/// Encode a flag the way the browser stringifies booleans.
pub fn bool_to_stored(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// In-memory storage used outside the browser.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate entries, mainly for tests and fixtures.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Self {
            entries: RefCell::new(map),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// `window.localStorage` backend.
#[cfg(feature = "csr")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStore;

#[cfg(feature = "csr")]
impl BrowserStore {
    fn storage() -> Option<web_sys::Storage> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; session values will not persist");
        }
        storage
    }
}

#[cfg(feature = "csr")]
impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if storage.set_item(key, value).is_err() {
            log::warn!("localStorage write failed for key {key}");
        }
    }

    fn remove(&self, key: &str) {
        let Some(storage) = Self::storage() else {
            return;
        };
        if storage.remove_item(key).is_err() {
            log::warn!("localStorage remove failed for key {key}");
        }
    }
}

/// The storage backend for the current build target.
#[must_use]
pub fn default_store() -> SharedStore {
    #[cfg(feature = "csr")]
    {
        Rc::new(BrowserStore)
    }
    #[cfg(not(feature = "csr"))]
    {
        Rc::new(MemoryStore::new())
    }
}
