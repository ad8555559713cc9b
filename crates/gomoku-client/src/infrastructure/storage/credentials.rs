//! Auth token persistence.
//!
//! The whole persistent surface of the client is one opaque token string
//! under a well-known path, read at startup for silent re-authentication
//! and cleared on logout.  No other credential material ever touches disk.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use crate::application::context::{CredentialStore, StorageError};
use crate::infrastructure::storage::config::{config_dir, ConfigError};

/// File name of the token inside the platform config directory.
const TOKEN_FILE: &str = "token";

/// File-backed credential store.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The store at the platform-default location
    /// (`<config dir>/token`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the platform config directory cannot be
    /// determined.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        Ok(Self::new(config_dir()?.join(TOKEN_FILE)))
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                // An unreadable token degrades to "not logged in" rather
                // than failing startup.
                warn!("could not read token at {}: {e}", self.path.display());
                None
            }
        }
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, token).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// In-memory credential store, used by tests and for ephemeral sessions
/// where nothing should persist.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    /// Seeds the store, e.g. to simulate a returning user.
    pub fn set(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn store(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_token_path(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "gomoku_cred_test_{tag}_{}",
            std::process::id()
        ));
        dir.join("nested").join(TOKEN_FILE)
    }

    fn cleanup(path: &PathBuf) {
        if let Some(root) = path.parent().and_then(|p| p.parent()) {
            std::fs::remove_dir_all(root).ok();
        }
    }

    #[test]
    fn test_file_store_round_trips_token() {
        // Arrange
        let path = temp_token_path("roundtrip");
        let store = FileCredentialStore::new(path.clone());

        // Act – store creates intermediate directories as needed
        store.store("T1").unwrap();

        // Assert
        assert_eq!(store.load().as_deref(), Some("T1"));
        cleanup(&path);
    }

    #[test]
    fn test_file_store_load_missing_file_is_none() {
        let store = FileCredentialStore::new(temp_token_path("missing"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_file_store_clear_removes_token() {
        let path = temp_token_path("clear");
        let store = FileCredentialStore::new(path.clone());
        store.store("T1").unwrap();

        store.clear().unwrap();

        assert_eq!(store.load(), None);
        cleanup(&path);
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let store = FileCredentialStore::new(temp_token_path("idempotent"));
        // Clearing a store that never held a token must succeed.
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_ignores_surrounding_whitespace() {
        let path = temp_token_path("whitespace");
        let store = FileCredentialStore::new(path.clone());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "  T1\n").unwrap();

        assert_eq!(store.load().as_deref(), Some("T1"));
        cleanup(&path);
    }

    #[test]
    fn test_file_store_empty_file_is_no_token() {
        let path = temp_token_path("empty");
        let store = FileCredentialStore::new(path.clone());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "").unwrap();

        assert_eq!(store.load(), None);
        cleanup(&path);
    }

    #[test]
    fn test_memory_store_round_trips() {
        let store = MemoryCredentialStore::default();
        assert_eq!(store.load(), None);

        store.store("T1").unwrap();
        assert_eq!(store.load().as_deref(), Some("T1"));

        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }
}
