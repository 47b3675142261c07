use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use keyring::Entry;

use super::store::{StoredTokens, TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRY_KEY};

const SERVICE_NAME: &str = "flashdeck";

/// Tokens in the OS keychain, one entry per fixed storage key.
pub struct KeyringTokenStore {
    service: String,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl KeyringTokenStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).context("Failed to create keyring entry")
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {} from keychain", key)),
        }
    }

    fn write(&self, key: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self
                .entry(key)?
                .set_password(value)
                .with_context(|| format!("Failed to store {} in keychain", key)),
            None => self.delete(key),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {} from keychain", key)),
        }
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<StoredTokens> {
        let token_expiry = self
            .read(TOKEN_EXPIRY_KEY)?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(StoredTokens {
            access_token: self.read(ACCESS_TOKEN_KEY)?,
            refresh_token: self.read(REFRESH_TOKEN_KEY)?,
            token_expiry,
        })
    }

    fn save(&self, tokens: &StoredTokens) -> Result<()> {
        self.write(ACCESS_TOKEN_KEY, tokens.access_token.as_deref())?;
        self.write(REFRESH_TOKEN_KEY, tokens.refresh_token.as_deref())?;
        let expiry = tokens.token_expiry.map(|dt| dt.to_rfc3339());
        self.write(TOKEN_EXPIRY_KEY, expiry.as_deref())
    }

    fn clear(&self) -> Result<()> {
        // Attempt every key even if one fails
        let results = [
            self.delete(ACCESS_TOKEN_KEY),
            self.delete(REFRESH_TOKEN_KEY),
            self.delete(TOKEN_EXPIRY_KEY),
        ];
        results.into_iter().collect()
    }
}
