use reqwest::Method;
use serde::Serialize;

use super::ApiError;

/// Description of one outbound call, relative to the API base URL.
///
/// Requests are plain data so a request that hit a 401 can be parked while
/// a refresh runs and replayed afterwards with a new bearer token.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    bearer: Option<String>,
    authenticated: bool,
    retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            body: None,
            bearer: None,
            authenticated: true,
            retried: false,
        }
    }

    pub fn get(segments: &[&str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub fn post(segments: &[&str]) -> Self {
        Self::new(Method::POST, segments)
    }

    pub fn put(segments: &[&str]) -> Self {
        Self::new(Method::PUT, segments)
    }

    pub fn delete(segments: &[&str]) -> Self {
        Self::new(Method::DELETE, segments)
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is given.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Send without credentials and without the refresh flow
    /// (login, signup, password reset, the refresh call itself).
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether this request is already a replay after a refresh.
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    /// Path for logging, e.g. `/decks/42/cards`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub(crate) fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = if self.authenticated { token } else { None };
        self
    }

    pub(crate) fn into_replay(self, token: &str) -> Self {
        let mut replay = self.with_bearer(Some(token.to_string()));
        replay.retried = true;
        replay
    }
}
