//! Authenticated request gateway.
//!
//! Every call made through [`Gateway::send`] carries the stored access token.
//! When a call comes back 401, the gateway runs at most one token refresh at
//! a time:
//!
//! - the first unauthorized request moves the gateway from `Idle` to
//!   `RefreshInFlight` and calls `POST /auth/refresh`
//! - unauthorized requests arriving while that refresh runs are parked in
//!   arrival order
//! - on success every request (the first one and all parked ones) is replayed
//!   once with the new token
//! - on failure every parked request is rejected, stored credentials are
//!   cleared and the session is ended
//! - if the refreshing request is dropped mid-refresh, parked requests fail
//!   with [`ApiError::RefreshCancelled`] and the stored credentials are kept
//!
//! A replayed request that is unauthorized again fails with
//! [`ApiError::Unauthorized`] rather than starting another refresh.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::{ApiError, ApiRequest};
use crate::auth::SessionManager;

/// Outcome handed to a parked request: itself, ready to replay, or the
/// reason the session ended.
type Resume = Result<ApiRequest, ApiError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// A request suspended while a refresh is in flight.
struct QueuedRequest {
    request: ApiRequest,
    resume: oneshot::Sender<Resume>,
}

enum RefreshState {
    Idle,
    /// Requests that hit a 401 during the current refresh, in arrival order.
    RefreshInFlight(Vec<QueuedRequest>),
}

pub struct Gateway {
    http: Client,
    base_url: Url,
    session: Arc<SessionManager>,
    // Never held across an await.
    refresh: Mutex<RefreshState>,
}

impl Gateway {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionManager>,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Configuration(format!("Invalid API base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Configuration(format!(
                "API base URL {base_url} cannot carry a path"
            )));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            session,
            refresh: Mutex::new(RefreshState::Idle),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Whether a token refresh is currently running.
    pub fn is_refreshing(&self) -> bool {
        matches!(*self.state(), RefreshState::RefreshInFlight(_))
    }

    /// Number of requests parked behind the running refresh.
    pub fn queued(&self) -> usize {
        match &*self.state() {
            RefreshState::Idle => 0,
            RefreshState::RefreshInFlight(queue) => queue.len(),
        }
    }

    fn state(&self) -> MutexGuard<'_, RefreshState> {
        self.refresh.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send a request with the stored access token, renewing the session
    /// once if the backend answers 401.
    pub async fn send(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let request = request.with_bearer(self.session.access_token());
        let response = self.dispatch(&request).await?;

        if response.status() != StatusCode::UNAUTHORIZED || !request.is_authenticated() {
            return Self::check_response(response).await;
        }
        if request.is_retried() {
            warn!(path = %request.path(), "Replayed request unauthorized again");
            return Self::check_response(response).await;
        }

        debug!(path = %request.path(), "Unauthorized, renewing session");
        let replay = self.recover(request).await?;
        let response = self.dispatch(&replay).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(path = %replay.path(), "Replayed request unauthorized again");
        }
        Self::check_response(response).await
    }

    /// Send a request with the stored access token but without the
    /// refresh flow; a 401 is returned as [`ApiError::Unauthorized`].
    pub async fn send_once(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let request = request.with_bearer(self.session.access_token());
        let response = self.dispatch(&request).await?;
        Self::check_response(response).await
    }

    /// Turn an unauthorized request into a replay carrying a fresh token,
    /// either by running the refresh or by waiting for the one in flight.
    async fn recover(&self, request: ApiRequest) -> Result<ApiRequest, ApiError> {
        let request = match self.park_or_lead(request) {
            Ok(waiter) => return waiter.await.unwrap_or(Err(ApiError::RefreshCancelled)),
            Err(request) => request,
        };

        let cycle = RefreshCycle::new(self);
        match self.refresh_access_token().await {
            Ok(token) => {
                cycle.finish(RefreshOutcome::Renewed(&token));
                Ok(request.into_replay(&token))
            }
            Err(e) => {
                let reason = match e {
                    ApiError::SessionEnded(reason) => reason,
                    other => other.to_string(),
                };
                self.session.end(&reason);
                cycle.finish(RefreshOutcome::Ended(&reason));
                Err(ApiError::SessionEnded(reason))
            }
        }
    }

    /// Queue `request` behind the refresh in flight, returning the handle it
    /// will be resumed through. When no refresh is running the request is
    /// handed back and the caller must run one.
    fn park_or_lead(&self, request: ApiRequest) -> Result<oneshot::Receiver<Resume>, ApiRequest> {
        let mut state = self.state();
        match &mut *state {
            RefreshState::RefreshInFlight(queue) => {
                let (resume, waiter) = oneshot::channel();
                debug!(path = %request.path(), position = queue.len(), "Refresh in flight, queueing request");
                queue.push(QueuedRequest { request, resume });
                Ok(waiter)
            }
            RefreshState::Idle => {
                *state = RefreshState::RefreshInFlight(Vec::new());
                Err(request)
            }
        }
    }

    /// Exchange the stored refresh token for a new access token and persist it.
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let Some(refresh_token) = self.session.refresh_token() else {
            return Err(ApiError::SessionEnded("No refresh token available".to_string()));
        };

        info!("Refreshing access token");
        let request = ApiRequest::post(&["auth", "refresh"])
            .anonymous()
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })?;
        let response = self.dispatch(&request).await?;
        let response = Self::check_response(response).await?;
        let renewed: RefreshResponse = response.json().await?;

        self.session
            .renew(
                renewed.access_token.clone(),
                renewed.refresh_token,
                renewed.expires_in,
            )
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        Ok(renewed.access_token)
    }

    /// Resolve or reject every parked request, then return to `Idle`.
    /// Runs under the state lock so no request can join a drained queue.
    fn finish_refresh(&self, outcome: RefreshOutcome<'_>) {
        let mut state = self.state();
        let queue = match std::mem::replace(&mut *state, RefreshState::Idle) {
            RefreshState::RefreshInFlight(queue) => queue,
            RefreshState::Idle => Vec::new(),
        };

        debug!(queued = queue.len(), outcome = ?outcome, "Draining refresh queue");
        for QueuedRequest { request, resume } in queue {
            let path = request.path();
            let message = match outcome {
                RefreshOutcome::Renewed(token) => Ok(request.into_replay(token)),
                RefreshOutcome::Ended(reason) => Err(ApiError::SessionEnded(reason.to_string())),
                RefreshOutcome::Cancelled => Err(ApiError::RefreshCancelled),
            };
            if resume.send(message).is_err() {
                debug!(path = %path, "Queued request was dropped before the refresh finished");
            }
        }
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration("API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(request.segments());
        Ok(url)
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let url = self.url_for(request)?;
        debug!(
            method = %request.method(),
            path = %request.path(),
            authorized = request.bearer().is_some(),
            retried = request.is_retried(),
            "Sending request"
        );

        let mut builder = self.http.request(request.method().clone(), url);
        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }
        if let Some(token) = request.bearer() {
            builder = builder.bearer_auth(token);
        }

        Ok(builder.send().await?)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

/// How a refresh run ended, as seen by the requests parked behind it.
#[derive(Clone, Copy)]
enum RefreshOutcome<'a> {
    /// New access token; every parked request is replayed with it.
    Renewed(&'a str),
    /// The session could not be renewed and has been ended.
    Ended(&'a str),
    /// The refreshing future was dropped. Stored credentials are untouched.
    Cancelled,
}

impl std::fmt::Debug for RefreshOutcome<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshOutcome::Renewed(_) => f.write_str("Renewed"),
            RefreshOutcome::Ended(reason) => write!(f, "Ended({reason})"),
            RefreshOutcome::Cancelled => f.write_str("Cancelled"),
        }
    }
}

/// One refresh run. If the refreshing future is dropped before finishing,
/// parked requests fail with [`ApiError::RefreshCancelled`] and the gateway
/// returns to `Idle` instead of waiting forever.
struct RefreshCycle<'a> {
    gateway: &'a Gateway,
    finished: bool,
}

impl<'a> RefreshCycle<'a> {
    fn new(gateway: &'a Gateway) -> Self {
        Self {
            gateway,
            finished: false,
        }
    }

    fn finish(mut self, outcome: RefreshOutcome<'_>) {
        self.finished = true;
        self.gateway.finish_refresh(outcome);
    }
}

impl Drop for RefreshCycle<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("Token refresh cancelled before completing");
            self.gateway.finish_refresh(RefreshOutcome::Cancelled);
        }
    }
}
