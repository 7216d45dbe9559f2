//! File-backed token store.
//!
//! Reads/writes `~/.wlms/credentials.toml`:
//!
//! ```toml
//! [wlms]
//! access_token = "..."
//! refresh_token = "..."
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SessionError;
use crate::pair::CredentialPair;
use crate::store::TokenStore;

/// On-disk layout. The pair lives under the `wlms` table so the file
/// stays namespaced even if other tools share the directory.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wlms: Option<CredentialPair>,
}

/// TokenStore backed by a TOML file.
///
/// The file is created on first `save`; `clear` removes it entirely so
/// a half-written pair can never be observed.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store at an explicit path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default path: ~/.wlms/credentials.toml.
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Default credentials file path.
    pub fn default_path() -> PathBuf {
        dirs_path().join("credentials.toml")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<CredentialPair>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| SessionError::Storage(e.to_string()))?;
        let file: CredentialsFile =
            toml::from_str(&content).map_err(|e| SessionError::Serialization(e.to_string()))?;
        Ok(file.wlms)
    }

    fn save(&self, pair: &CredentialPair) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Storage(e.to_string()))?;
        }
        let file = CredentialsFile {
            wlms: Some(pair.clone()),
        };
        let content =
            toml::to_string_pretty(&file).map_err(|e| SessionError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| SessionError::Storage(e.to_string()))?;
        debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| SessionError::Storage(e.to_string()))?;
            debug!(path = %self.path.display(), "credentials cleared");
        }
        Ok(())
    }
}

/// Return the WLMS config directory (~/.wlms).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".wlms")
}
