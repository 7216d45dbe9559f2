use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::SessionError;
use crate::pair::CredentialPair;
use crate::store::TokenStore;

/// Injectable credential session.
///
/// Constructed once at app start and passed to whatever issues requests;
/// nothing reads tokens from ambient global state. The store is the
/// source of truth; a cached copy avoids hitting it on every request.
/// `set`/`clear` write through to the store before updating the cache.
pub struct Session {
    store: Arc<dyn TokenStore>,
    cached: RwLock<Option<CredentialPair>>,
}

impl Session {
    /// Open a session over a store, loading any persisted pair.
    pub fn open(store: Arc<dyn TokenStore>) -> Result<Self, SessionError> {
        let cached = store.load()?;
        Ok(Self {
            store,
            cached: RwLock::new(cached),
        })
    }

    /// Current pair, if logged in.
    pub fn get(&self) -> Option<CredentialPair> {
        self.cached.read().unwrap().clone()
    }

    /// Current access token, if logged in.
    pub fn access_token(&self) -> Option<String> {
        self.cached
            .read()
            .unwrap()
            .as_ref()
            .map(|p| p.access_token.clone())
    }

    /// Replace the pair wholesale (login, refresh).
    pub fn set(&self, pair: CredentialPair) -> Result<(), SessionError> {
        self.store.save(&pair)?;
        *self.cached.write().unwrap() = Some(pair);
        debug!("session pair replaced");
        Ok(())
    }

    /// Drop both slots (logout, failed refresh).
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.clear()?;
        *self.cached.write().unwrap() = None;
        debug!("session cleared");
        Ok(())
    }
}
