//! Token storage for persisting OAuth tokens.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::token::Token;

/// Persistence for the client's single current token.
///
/// Supplied by the caller; nothing in this crate assumes a backend.
pub trait TokenStorage: Send + Sync {
    /// Load the stored token, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<Token>>;

    /// Save a token, replacing any previous one.
    fn save(&self, token: &Token) -> Result<()>;

    /// Delete the stored token. Deleting nothing is not an error.
    fn delete(&self) -> Result<()>;
}

impl<T: TokenStorage + ?Sized> TokenStorage for Arc<T> {
    fn load(&self) -> Result<Option<Token>> {
        (**self).load()
    }

    fn save(&self, token: &Token) -> Result<()> {
        (**self).save(token)
    }

    fn delete(&self) -> Result<()> {
        (**self).delete()
    }
}

/// File-based token storage, one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Storage for `key` under the default directory.
    ///
    /// Default path: `~/.amocrm-api/tokens/<key>.json`
    pub fn new(key: &str) -> Result<Self> {
        Ok(Self::in_dir(default_token_dir()?, key))
    }

    /// Storage for `key` under a custom directory.
    pub fn in_dir(dir: impl AsRef<Path>, key: &str) -> Self {
        // Sanitize the key to create a safe filename
        let safe_key = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect::<String>();

        Self {
            path: dir.as_ref().join(format!("{safe_key}.json")),
        }
    }

    /// The token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<Token>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = std::fs::read_to_string(&self.path)?;
        let stored: StoredToken = serde_json::from_str(&json).map_err(|e| {
            Error::with_source(
                ErrorKind::Storage(format!("corrupt token file {}", self.path.display())),
                e,
            )
        })?;

        Ok(Some(stored.token))
    }

    fn save(&self, token: &Token) -> Result<()> {
        self.ensure_dir()?;

        let stored = StoredToken {
            token: token.clone(),
            stored_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, json)?;

        // Set restrictive permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }

        Ok(())
    }
}

/// In-memory token storage, handy for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<Token>>,
    saves: Mutex<usize>,
}

impl MemoryTokenStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a token.
    pub fn with_token(token: Token) -> Self {
        Self {
            token: Mutex::new(Some(token)),
            saves: Mutex::new(0),
        }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<Token>> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, token: &Token) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.clone());
        *self.saves.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Token with storage metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: Token,
    stored_at: chrono::DateTime<chrono::Utc>,
}

/// Get the default token storage directory.
pub fn default_token_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::new(ErrorKind::Config("Could not find home directory".to_string())))?;

    Ok(home.join(".amocrm-api").join("tokens"))
}
