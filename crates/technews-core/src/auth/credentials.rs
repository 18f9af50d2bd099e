use anyhow::{Context, Result};
use chrono::Duration;
use keyring::Entry;

use super::store::{StoredToken, TokenKind, TokenStore};

const SERVICE_NAME: &str = "technews";

/// Token pair kept in the OS keychain.
///
/// Each token is one keychain entry named after its fixed key, holding the
/// token and its expiry serialized as JSON.
pub struct KeyringTokenStore {
    service: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a custom keychain service name (one per API host, for example).
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, kind: TokenKind) -> Result<Entry> {
        Entry::new(&self.service, kind.key()).context("Failed to create keyring entry")
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let secret = match self.entry(kind)?.get_password() {
            Ok(secret) => secret,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(e).context("Failed to retrieve token from keychain"),
        };

        let token: StoredToken =
            serde_json::from_str(&secret).context("Failed to parse token from keychain")?;
        if token.is_expired() {
            return Ok(None);
        }
        Ok(Some(token.value))
    }

    fn set(&self, kind: TokenKind, token: &str, ttl: Duration) -> Result<()> {
        let secret = serde_json::to_string(&StoredToken::new(token, ttl))?;
        self.entry(kind)?
            .set_password(&secret)
            .context("Failed to store token in keychain")
    }

    fn remove(&self, kind: TokenKind) -> Result<()> {
        match self.entry(kind)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}
