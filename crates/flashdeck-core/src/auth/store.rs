use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const TOKEN_EXPIRY_KEY: &str = "tokenExpiry";

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Raw token state as persisted. Each key may be independently missing;
/// `SessionManager` decides what a partial state means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(rename = "tokenExpiry", default, skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<DateTime<Utc>>,
}

impl StoredTokens {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Persistence for the credential pair.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<StoredTokens>;
    fn save(&self, tokens: &StoredTokens) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Tokens in a JSON file keyed by the fixed storage names.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<StoredTokens> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(StoredTokens::default());
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        serde_json::from_str(&contents).context("Failed to parse session file")
    }

    fn save(&self, tokens: &StoredTokens) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(tokens)?;
        std::fs::write(&path, contents).context("Failed to write session file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: StoredTokens) -> Self {
        Self {
            tokens: Mutex::new(tokens),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<StoredTokens> {
        let guard = self
            .tokens
            .lock()
            .map_err(|_| anyhow::anyhow!("Token store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, tokens: &StoredTokens) -> Result<()> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|_| anyhow::anyhow!("Token store lock poisoned"))?;
        *guard = tokens.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save(&StoredTokens::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> StoredTokens {
        StoredTokens {
            access_token: Some("access".into()),
            refresh_token: Some("refresh".into()),
            token_expiry: None,
        }
    }

    #[test]
    fn test_file_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileTokenStore::new(dir.path().join("nested"));

        assert!(store.load().expect("load empty").is_empty());

        store.save(&tokens()).expect("save");
        assert_eq!(store.load().expect("load"), tokens());

        store.clear().expect("clear");
        assert!(store.load().expect("load after clear").is_empty());
        // Clearing twice is fine
        store.clear().expect("clear again");
    }

    #[test]
    fn test_file_uses_fixed_key_names() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileTokenStore::new(dir.path().to_path_buf());
        store.save(&tokens()).expect("save");

        let raw = std::fs::read_to_string(dir.path().join(SESSION_FILE)).expect("read");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(json[ACCESS_TOKEN_KEY], "access");
        assert_eq!(json[REFRESH_TOKEN_KEY], "refresh");
        assert!(json.get(TOKEN_EXPIRY_KEY).is_none());
    }

    #[test]
    fn test_file_store_reads_partial_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join(SESSION_FILE), r#"{"refreshToken":"only"}"#).expect("write");
        let loaded = FileTokenStore::new(dir.path().to_path_buf()).load().expect("load");
        assert_eq!(loaded.access_token, None);
        assert_eq!(loaded.refresh_token.as_deref(), Some("only"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_tokens(tokens());
        assert_eq!(store.load().expect("load"), tokens());
        store.clear().expect("clear");
        assert!(store.load().expect("load").is_empty());
    }
}
