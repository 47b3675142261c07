use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::store::{StoredTokens, TokenStore};
use crate::models::AuthTokens;

/// Buffer before expiry at which a session is reported as expiring soon
const EXPIRY_WARNING_MINUTES: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// A full credential pair is stored.
    Active,
    /// No credentials, either never logged in or logged out deliberately.
    SignedOut,
    /// Credentials were discarded because they could not be renewed.
    /// Front ends react by sending the user back to login.
    Ended,
}

/// A complete credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| Utc::now() > at).unwrap_or(false)
    }

    /// Check if the access token will expire within the warning window
    pub fn expires_soon(&self) -> bool {
        self.expires_at
            .map(|at| Utc::now() + Duration::minutes(EXPIRY_WARNING_MINUTES) > at)
            .unwrap_or(false)
    }

    /// Minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.expires_at
            .map(|at| (at - Utc::now()).num_minutes().max(0))
    }
}

/// Owns the stored credential pair for one client instance.
///
/// The gateway reads tokens through this type and is the only caller of
/// [`SessionManager::end`]. Everything that changes the tokens writes
/// through to the backing [`TokenStore`].
pub struct SessionManager {
    store: Box<dyn TokenStore>,
    tokens: RwLock<StoredTokens>,
    status: watch::Sender<SessionStatus>,
}

impl SessionManager {
    /// Load any stored tokens from `store`.
    pub fn new(store: Box<dyn TokenStore>) -> Result<Self> {
        let tokens = store.load()?;
        let status = if Self::is_complete(&tokens) {
            SessionStatus::Active
        } else {
            if !tokens.is_empty() {
                debug!("Stored credentials are incomplete, treating as signed out");
            }
            SessionStatus::SignedOut
        };
        let (status, _) = watch::channel(status);

        Ok(Self {
            store,
            tokens: RwLock::new(tokens),
            status,
        })
    }

    fn is_complete(tokens: &StoredTokens) -> bool {
        tokens.access_token.is_some() && tokens.refresh_token.is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoredTokens> {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace(&self, tokens: StoredTokens) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = tokens;
    }

    /// The stored access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    /// The stored refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    /// The credential pair, only when both tokens are present.
    pub fn credentials(&self) -> Option<Credentials> {
        let tokens = self.read();
        match (&tokens.access_token, &tokens.refresh_token) {
            (Some(access), Some(refresh)) => Some(Credentials {
                access_token: access.clone(),
                refresh_token: refresh.clone(),
                expires_at: tokens.token_expiry,
            }),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        Self::is_complete(&self.read())
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Watch for status changes, e.g. to return to login when the session ends.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Store the tokens from a successful login.
    pub fn start(&self, tokens: &AuthTokens) -> Result<()> {
        let stored = StoredTokens {
            access_token: Some(tokens.access_token.clone()),
            refresh_token: Some(tokens.refresh_token.clone()),
            token_expiry: expiry_from(tokens.expires_in),
        };
        self.store.save(&stored)?;
        self.replace(stored);
        self.status.send_replace(SessionStatus::Active);
        info!("Session started");
        Ok(())
    }

    /// Store a renewed access token. The refresh token and expiry are only
    /// replaced when the refresh response carried new values.
    pub fn renew(
        &self,
        access_token: String,
        refresh_token: Option<String>,
        expires_in: Option<i64>,
    ) -> Result<()> {
        let mut stored = self.read().clone();
        stored.access_token = Some(access_token);
        if let Some(refresh_token) = refresh_token {
            stored.refresh_token = Some(refresh_token);
        }
        if let Some(expires_in) = expires_in {
            stored.token_expiry = expiry_from(expires_in);
        }
        self.store.save(&stored)?;
        let complete = Self::is_complete(&stored);
        self.replace(stored);
        if complete {
            self.status.send_replace(SessionStatus::Active);
        }
        debug!("Access token renewed");
        Ok(())
    }

    /// Discard credentials that can no longer be renewed.
    pub fn end(&self, reason: &str) {
        warn!(reason = %reason, "Session ended");
        if let Err(e) = self.clear() {
            warn!(error = %e, "Failed to clear stored credentials");
        }
        self.status.send_replace(SessionStatus::Ended);
    }

    /// Discard credentials at the user's request.
    pub fn sign_out(&self) -> Result<()> {
        let result = self.clear();
        self.status.send_replace(SessionStatus::SignedOut);
        info!("Signed out");
        result
    }

    fn clear(&self) -> Result<()> {
        self.replace(StoredTokens::default());
        self.store.clear()
    }
}

fn expiry_from(expires_in: i64) -> Option<DateTime<Utc>> {
    (expires_in > 0).then(|| Utc::now() + Duration::seconds(expires_in))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    fn login_tokens() -> AuthTokens {
        AuthTokens {
            access_token: "access-1".into(),
            refresh_token: "refresh-1".into(),
            token_type: "Bearer".into(),
            expires_in: 900,
        }
    }

    fn manager_with(tokens: StoredTokens) -> SessionManager {
        SessionManager::new(Box::new(MemoryTokenStore::with_tokens(tokens))).expect("session")
    }

    #[test]
    fn test_partial_state_is_unauthenticated() {
        let session = manager_with(StoredTokens {
            access_token: Some("access".into()),
            refresh_token: None,
            token_expiry: None,
        });
        assert!(!session.is_authenticated());
        assert!(session.credentials().is_none());
        assert_eq!(session.status(), SessionStatus::SignedOut);
        // The raw value is still readable for dispatch
        assert_eq!(session.access_token().as_deref(), Some("access"));
    }

    #[test]
    fn test_start_stores_pair_and_expiry() {
        let session = manager_with(StoredTokens::default());
        session.start(&login_tokens()).expect("start");

        let creds = session.credentials().expect("credentials");
        assert_eq!(creds.access_token, "access-1");
        assert_eq!(creds.refresh_token, "refresh-1");
        assert!(!creds.is_expired());
        let minutes = creds.minutes_until_expiry().expect("expiry");
        assert!((14..=15).contains(&minutes));
        assert_eq!(session.status(), SessionStatus::Active);
    }

    #[test]
    fn test_renew_keeps_refresh_token_unless_rotated() {
        let session = manager_with(StoredTokens::default());
        session.start(&login_tokens()).expect("start");

        session.renew("access-2".into(), None, None).expect("renew");
        let creds = session.credentials().expect("credentials");
        assert_eq!(creds.access_token, "access-2");
        assert_eq!(creds.refresh_token, "refresh-1");

        session
            .renew("access-3".into(), Some("refresh-2".into()), Some(60))
            .expect("renew");
        assert_eq!(session.refresh_token().as_deref(), Some("refresh-2"));
        assert!(session.credentials().expect("credentials").expires_soon());
    }

    #[test]
    fn test_end_clears_and_notifies() {
        let session = manager_with(StoredTokens::default());
        session.start(&login_tokens()).expect("start");
        let rx = session.subscribe();

        session.end("refresh rejected");

        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert_eq!(*rx.borrow(), SessionStatus::Ended);
    }

    #[test]
    fn test_sign_out() {
        let session = manager_with(StoredTokens::default());
        session.start(&login_tokens()).expect("start");
        session.sign_out().expect("sign out");
        assert!(!session.is_authenticated());
        assert_eq!(session.status(), SessionStatus::SignedOut);
    }
}
