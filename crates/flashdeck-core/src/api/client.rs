//! API client for the flashcard backend.
//!
//! This module provides the `ApiClient` struct. The endpoint methods live in
//! the sibling `auth`, `decks`, `cards` and `study` modules.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{ApiError, ApiRequest, Gateway};
use crate::auth::{SessionManager, TokenStore};
use crate::config::Config;
use crate::models::MessageResponse;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the flashcard backend.
/// Clone is cheap - every clone shares one gateway, so refreshes are
/// coordinated across all of them.
#[derive(Clone)]
pub struct ApiClient {
    gateway: Arc<Gateway>,
}

impl ApiClient {
    /// Create a client for `base_url` backed by `store`.
    pub fn new(base_url: &str, store: Box<dyn TokenStore>) -> Result<Self, ApiError> {
        let session = SessionManager::new(store).map_err(|e| ApiError::Storage(e.to_string()))?;
        Self::with_session(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS), Arc::new(session))
    }

    /// Create a client from the application configuration. `base_url`, when
    /// given, takes precedence over every configured URL.
    pub fn from_config(
        config: &Config,
        base_url: Option<&str>,
        store: Box<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let session = SessionManager::new(store).map_err(|e| ApiError::Storage(e.to_string()))?;
        let base_url = base_url
            .map(str::to_string)
            .unwrap_or_else(|| config.api_base_url());
        Self::with_session(&base_url, config.request_timeout(), Arc::new(session))
    }

    pub fn with_session(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionManager>,
    ) -> Result<Self, ApiError> {
        let gateway = Gateway::new(base_url, timeout, session)?;
        Ok(Self {
            gateway: Arc::new(gateway),
        })
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> &SessionManager {
        self.gateway.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Send through the gateway and decode the JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let path = request.path();
        let response = if request.is_authenticated() {
            self.gateway.send(request).await?
        } else {
            self.gateway.send_once(request).await?
        };
        Self::decode(&path, response).await
    }

    /// Send through the gateway for endpoints that answer with an optional
    /// `{ "message": ... }` acknowledgement, or nothing at all.
    pub(crate) async fn acknowledge(&self, request: ApiRequest) -> Result<Option<String>, ApiError> {
        let response = if request.is_authenticated() {
            self.gateway.send(request).await?
        } else {
            self.gateway.send_once(request).await?
        };
        let text = response.text().await?;
        Ok(serde_json::from_str::<MessageResponse>(&text)
            .ok()
            .and_then(|m| m.message))
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }
}
