//! Browser storage abstraction.
//!
//! The flyout persists two values:
//!
//! - the last-opened section key, in **session** storage (per tab, cleared
//!   when the flyout closes),
//! - the pin flag, `"1"` or `"0"`, in **local** storage (survives sessions).
//!
//! [`Storage`] is the seam: the `web` binding implements it over
//! `window.sessionStorage` / `window.localStorage`, tests use
//! [`MemoryStorage`]. Reads and writes are synchronous and last-write-wins.
//! Anything unreadable is treated as unset.

use std::collections::HashMap;

use crate::config::StorageConfig;

/// A string key/value store with browser-storage semantics.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-process storage. Used natively and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Typed access to the flyout's persisted state.
#[derive(Debug, Clone)]
pub struct NavStore<S, L> {
    session: S,
    local: L,
    keys: StorageConfig,
}

impl<S: Storage, L: Storage> NavStore<S, L> {
    pub fn new(session: S, local: L, keys: StorageConfig) -> Self {
        Self {
            session,
            local,
            keys,
        }
    }

    /// Last-opened section key. Empty values count as unset.
    pub fn section_key(&self) -> Option<String> {
        self.session
            .get(&self.keys.section_key)
            .filter(|k| !k.is_empty())
    }

    pub fn set_section_key(&mut self, key: &str) {
        self.session.set(&self.keys.section_key, key);
    }

    pub fn clear_section_key(&mut self) {
        self.session.remove(&self.keys.section_key);
    }

    /// Persisted pin preference: `Some` for `"1"`/`"0"`, `None` when unset or
    /// malformed.
    pub fn pinned(&self) -> Option<bool> {
        match self.local.get(&self.keys.pin_key).as_deref() {
            Some("1") => Some(true),
            Some("0") => Some(false),
            Some(other) => {
                log::debug!("ignoring malformed pin flag {other:?}");
                None
            }
            None => None,
        }
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.local
            .set(&self.keys.pin_key, if pinned { "1" } else { "0" });
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn into_parts(self) -> (S, L) {
        (self.session, self.local)
    }
}
