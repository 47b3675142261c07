//! Account endpoints: signup, login, logout, email verification,
//! password reset and profile.

use serde::Serialize;
use tracing::{info, warn};

use super::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    AuthTokens, LoginRequest, RegisterRequest, RequestPasswordResetRequest, ResetPasswordRequest,
    User, VerifyEmailRequest,
};
use crate::validation::{self, require};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutRequest {
    refresh_token: String,
}

impl ApiClient {
    /// Register a new account. The backend sends a verification email.
    pub async fn signup(&self, data: &RegisterRequest) -> Result<Option<String>, ApiError> {
        validation::validate_username(&data.username)?;
        validation::validate_email(&data.email)?;
        validation::validate_password(&data.password)?;

        let request = ApiRequest::post(&["auth", "signup"]).anonymous().json(data)?;
        self.acknowledge(request).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<Option<String>, ApiError> {
        require("Verification token", token)?;

        let body = VerifyEmailRequest {
            token: token.to_string(),
        };
        let request = ApiRequest::post(&["auth", "verify-email"]).anonymous().json(&body)?;
        self.acknowledge(request).await
    }

    /// Authenticate and start a session with the returned tokens.
    pub async fn login(&self, data: &LoginRequest) -> Result<AuthTokens, ApiError> {
        require("Username", &data.username)?;
        require("Password", &data.password)?;

        let request = ApiRequest::post(&["auth", "login"]).anonymous().json(data)?;
        let tokens: AuthTokens = self.fetch(request).await?;

        self.session()
            .start(&tokens)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        info!(username = %data.username, "Login successful");
        Ok(tokens)
    }

    /// Revoke the refresh token server-side, then clear local credentials.
    /// Local credentials are cleared even if the backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Some(refresh_token) = self.session().refresh_token() {
            let request = ApiRequest::post(&["auth", "logout"]).json(&LogoutRequest { refresh_token })?;
            if let Err(e) = self.gateway().send_once(request).await {
                warn!(error = %e, "Error logging out");
            }
        }

        self.session()
            .sign_out()
            .map_err(|e| ApiError::Storage(e.to_string()))
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<Option<String>, ApiError> {
        validation::validate_email(email)?;

        let body = RequestPasswordResetRequest {
            email: email.to_string(),
        };
        let request = ApiRequest::post(&["auth", "forgot-password"]).anonymous().json(&body)?;
        self.acknowledge(request).await
    }

    pub async fn reset_password(&self, data: &ResetPasswordRequest) -> Result<Option<String>, ApiError> {
        require("Reset token", &data.token)?;
        validation::validate_password(&data.new_password)?;

        let request = ApiRequest::post(&["auth", "reset-password"]).anonymous().json(data)?;
        self.acknowledge(request).await
    }

    /// The signed-in user's profile.
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.fetch(ApiRequest::get(&["auth", "profile"])).await
    }
}
