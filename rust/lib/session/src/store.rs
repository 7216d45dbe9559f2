use std::sync::Mutex;

use crate::error::SessionError;
use crate::pair::CredentialPair;

/// Durable storage for the credential pair.
///
/// The pair is the unit of storage: implementations must never persist
/// one slot without the other. `load` after `clear` returns `None`.
pub trait TokenStore: Send + Sync {
    /// Read the stored pair, if any.
    fn load(&self) -> Result<Option<CredentialPair>, SessionError>;

    /// Persist a whole pair, replacing any previous one.
    fn save(&self, pair: &CredentialPair) -> Result<(), SessionError>;

    /// Remove both slots.
    fn clear(&self) -> Result<(), SessionError>;
}

/// In-memory store for tests and embedders with their own persistence.
#[derive(Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Option<CredentialPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, handy in tests.
    pub fn with_pair(pair: CredentialPair) -> Self {
        Self {
            inner: Mutex::new(Some(pair)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<CredentialPair>, SessionError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, pair: &CredentialPair) -> Result<(), SessionError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        *guard = Some(pair.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}
