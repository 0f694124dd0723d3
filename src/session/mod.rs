//! Session registry
//!
//! Maps opaque session tokens to usernames. The store is an explicit object
//! owned by the caller, with storage injected through [`SessionBackend`].
//! Entries have no expiry and live until deleted or the store is dropped.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::config::SessionConfig;
use crate::observability::telemetry::sanitize_for_log;

/// Token of the bootstrap session loaded by [`SessionStore::seeded`].
pub const BOOTSTRAP_TOKEN: &str = "abc123";
/// Username of the bootstrap session.
pub const BOOTSTRAP_USER: &str = "admin";

/// Storage behind a [`SessionStore`].
///
/// Implementations must be safe to share across threads. A token maps to at
/// most one username; `insert` on an existing token replaces it.
pub trait SessionBackend: Send + Sync {
    fn get(&self, token: &str) -> Option<String>;
    fn contains(&self, token: &str) -> bool;
    /// Returns the username previously stored for `token`, if any.
    fn insert(&self, token: String, username: String) -> Option<String>;
    /// Returns the removed username, if the token was present.
    fn remove(&self, token: &str) -> Option<String>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory backend: a map behind a read/write lock
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    sessions: RwLock<HashMap<String, String>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionBackend for InMemoryBackend {
    fn get(&self, token: &str) -> Option<String> {
        self.sessions.read().get(token).cloned()
    }

    fn contains(&self, token: &str) -> bool {
        self.sessions.read().contains_key(token)
    }

    fn insert(&self, token: String, username: String) -> Option<String> {
        self.sessions.write().insert(token, username)
    }

    fn remove(&self, token: &str) -> Option<String> {
        self.sessions.write().remove(token)
    }

    fn len(&self) -> usize {
        self.sessions.read().len()
    }
}

/// Token-to-username registry. Cloning shares the same backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.backend.len())
            .finish()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl SessionStore {
    pub fn new(backend: impl SessionBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Empty store backed by [`InMemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(InMemoryBackend::new())
    }

    /// In-memory store holding only the bootstrap `abc123 -> admin` session.
    pub fn seeded() -> Self {
        let store = Self::in_memory();
        store.create_session(BOOTSTRAP_TOKEN, BOOTSTRAP_USER);
        store
    }

    /// In-memory store pre-loaded with the configured seeds, in order.
    pub fn from_config(config: &SessionConfig) -> Self {
        let store = Self::in_memory();
        for seed in &config.seed {
            store.create_session(&seed.token, &seed.username);
        }
        store
    }

    /// Whether `token` is a known session. Never modifies the store.
    pub fn is_valid_session(&self, token: &str) -> bool {
        self.backend.contains(token)
    }

    /// Username bound to `token`, if any.
    pub fn get_user_from_session(&self, token: &str) -> Option<String> {
        self.backend.get(token)
    }

    /// Bind `token` to `username`, replacing any previous binding.
    pub fn create_session(&self, token: &str, username: &str) {
        let previous = self
            .backend
            .insert(token.to_string(), username.to_string());
        debug!(
            token = %mask_token(token),
            username = %sanitize_for_log(username),
            replaced = previous.is_some(),
            "Session created"
        );
    }

    /// Remove `token`. Unknown tokens are ignored.
    pub fn delete_session(&self, token: &str) {
        if self.backend.remove(token).is_some() {
            debug!(token = %mask_token(token), "Session deleted");
        }
    }

    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loggable form of a token: at most the first four characters.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    if prefix.chars().count() < token.chars().count() {
        format!("{}***", prefix)
    } else {
        "***".to_string()
    }
}
