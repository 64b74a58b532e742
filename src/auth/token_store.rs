//! Token store
//!
//! Process-wide holder of the current credential. Clones share one slot.

use super::types::Credential;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Shared, thread-safe credential slot
///
/// Reads before the first `set` return `None`. Writers never block readers
/// for longer than the slot update itself, and the last `set` wins.
#[derive(Clone, Default)]
pub struct TokenStore {
    current: Arc<RwLock<Option<Credential>>>,
}

impl TokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a token
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }

    /// Current credential, if any
    pub fn get(&self) -> Option<Credential> {
        // A poisoned lock still holds a consistent Option; keep serving it.
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.get().map(|c| c.token)
    }

    /// Replace the credential, stamping the current time
    pub fn set(&self, token: impl Into<String>) {
        let credential = Credential::new(token);
        debug!(acquired_at = %credential.acquired_at, "Credential stored");
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(credential);
    }

    /// Remove the credential (logout)
    pub fn clear(&self) {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.take().is_some() {
            debug!("Credential cleared");
        }
    }

    /// Whether a credential is present
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
