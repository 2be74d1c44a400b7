//! Signed-in state shared by every request.
//!
//! The token is loaded once when the `Session` is built, attached to requests
//! by the HTTP client and cleared on sign-out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use course_core::model::AuthToken;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TokenStoreError {
    #[error("token file i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("token file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Durable home for the bearer token.
pub trait TokenStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `TokenStoreError` if the stored token cannot be read.
    fn load(&self) -> Result<Option<AuthToken>, TokenStoreError>;

    /// # Errors
    ///
    /// Returns `TokenStoreError` if the token cannot be written.
    fn save(&self, token: &AuthToken) -> Result<(), TokenStoreError>;

    /// # Errors
    ///
    /// Returns `TokenStoreError` if the stored token cannot be removed.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    access_token: String,
}

/// Persists the token as `{"access_token": "..."}` in a JSON file.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let stored: StoredToken = serde_json::from_str(&raw)?;
        Ok(AuthToken::parse(stored.access_token))
    }

    fn save(&self, token: &AuthToken) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string(&StoredToken {
            access_token: token.as_str().to_string(),
        })?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keeps the token in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &AuthToken) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Explicit auth context, cloned into whatever needs the token.
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<AuthToken>>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Build a session from whatever the store holds.
    ///
    /// An unreadable store is logged and treated as signed out.
    #[must_use]
    pub fn load(store: Arc<dyn TokenStore>) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(err) => {
                log::warn!("ignoring unreadable session token: {err}");
                None
            }
        };
        if token.is_some() {
            log::debug!("restored persisted session token");
        }
        Self {
            token: Arc::new(RwLock::new(token)),
            store,
        }
    }

    /// A signed-out session that never touches disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryTokenStore::new()))
    }

    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Adopt `token` for subsequent requests and persist it.
    ///
    /// The in-memory token is replaced even when persisting fails.
    ///
    /// # Errors
    ///
    /// Returns `TokenStoreError` if the token could not be persisted.
    pub fn sign_in(&self, token: AuthToken) -> Result<(), TokenStoreError> {
        let persisted = self.store.save(&token);
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        persisted
    }

    /// Forget the token in memory and in the store.
    ///
    /// # Errors
    ///
    /// Returns `TokenStoreError` if the persisted copy could not be removed.
    pub fn sign_out(&self) -> Result<(), TokenStoreError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.store.clear()
    }
}
