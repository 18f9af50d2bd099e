//! Persistent storage for the access/refresh token pair.
//!
//! Both tokens are stored under fixed keys with independent expirations.
//! An entry past its expiry reads as absent, the same way an expired cookie
//! disappears from a browser jar.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in the cache directory
const SESSION_FILE: &str = "session.json";

/// Which half of the credential pair an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Fixed storage key for this token.
    pub fn key(&self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    pub fn new(value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            value: value.into(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn time_until_expiry(&self) -> Duration {
        self.expires_at - Utc::now()
    }
}

/// Session context holding the credential pair.
///
/// Implementations must be safe to share between concurrent requests; the
/// pipeline only ever calls these from async tasks without holding locks
/// across awaits.
pub trait TokenStore: Send + Sync {
    /// Read a token, returning `None` when absent or expired.
    fn get(&self, kind: TokenKind) -> Result<Option<String>>;

    /// Store a token, replacing any previous value.
    fn set(&self, kind: TokenKind, token: &str, ttl: Duration) -> Result<()>;

    /// Delete a single token.
    fn remove(&self, kind: TokenKind) -> Result<()>;

    /// Delete both tokens.
    fn clear(&self) -> Result<()> {
        self.remove(TokenKind::Access)?;
        self.remove(TokenKind::Refresh)
    }
}

fn live(entry: Option<&StoredToken>) -> Option<String> {
    entry.filter(|t| !t.is_expired()).map(|t| t.value.clone())
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store, used for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<TokenKind, StoredToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw entry, including already-expired ones.
    pub fn insert(&self, kind: TokenKind, token: StoredToken) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| anyhow!("token store lock poisoned"))?
            .insert(kind, token);
        Ok(())
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("token store lock poisoned"))?;
        Ok(live(entries.get(&kind)))
    }

    fn set(&self, kind: TokenKind, token: &str, ttl: Duration) -> Result<()> {
        self.insert(kind, StoredToken::new(token, ttl))
    }

    fn remove(&self, kind: TokenKind) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| anyhow!("token store lock poisoned"))?
            .remove(&kind);
        Ok(())
    }
}

// ============================================================================
// File store
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<StoredToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<StoredToken>,
}

impl SessionFile {
    fn slot(&mut self, kind: TokenKind) -> &mut Option<StoredToken> {
        match kind {
            TokenKind::Access => &mut self.access_token,
            TokenKind::Refresh => &mut self.refresh_token,
        }
    }

    fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Tokens persisted as JSON in the cache directory.
///
/// Reads and writes through one store share a per-store lock, so its
/// read-modify-write of the file cannot interleave. Separate stores opened
/// on the same directory are not serialized against each other.
pub struct FileTokenStore {
    cache_dir: PathBuf,
    lock: RwLock<()>,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    fn read_file(path: &Path) -> Result<SessionFile> {
        if !path.exists() {
            return Ok(SessionFile::default());
        }
        let contents = std::fs::read_to_string(path).context("Failed to read session file")?;
        serde_json::from_str(&contents).context("Failed to parse session file")
    }

    fn write_file(path: &Path, file: &SessionFile) -> Result<()> {
        if file.is_empty() {
            if path.exists() {
                std::fs::remove_file(path).context("Failed to remove session file")?;
            }
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(file)?;
        std::fs::write(path, contents).context("Failed to write session file")?;
        restrict_permissions(path)
    }

    fn update(&self, apply: impl FnOnce(&mut SessionFile)) -> Result<()> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| anyhow!("session file lock poisoned"))?;
        let path = self.path();
        let mut file = Self::read_file(&path)?;
        apply(&mut file);
        Self::write_file(&path, &file)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .context("Failed to restrict session file permissions")
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let _guard = self
            .lock
            .read()
            .map_err(|_| anyhow!("session file lock poisoned"))?;
        let mut file = Self::read_file(&self.path())?;
        Ok(live(file.slot(kind).as_ref()))
    }

    fn set(&self, kind: TokenKind, token: &str, ttl: Duration) -> Result<()> {
        let entry = StoredToken::new(token, ttl);
        self.update(|file| *file.slot(kind) = Some(entry))
    }

    fn remove(&self, kind: TokenKind) -> Result<()> {
        self.update(|file| *file.slot(kind) = None)
    }

    fn clear(&self) -> Result<()> {
        self.update(|file| *file = SessionFile::default())
    }
}
