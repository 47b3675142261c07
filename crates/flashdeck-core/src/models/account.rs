use serde::{Deserialize, Serialize};

/// The signed-in account as returned by `GET /auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Token pair issued by `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestPasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Acknowledgement returned by signup, verification and password endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_tokens() {
        let json = r#"{"accessToken":"a1","refreshToken":"r1","tokenType":"Bearer","expiresIn":900}"#;
        let tokens: AuthTokens = serde_json::from_str(json).expect("valid tokens");
        assert_eq!(tokens.access_token, "a1");
        assert_eq!(tokens.refresh_token, "r1");
        assert_eq!(tokens.expires_in, 900);
    }

    #[test]
    fn test_auth_tokens_defaults() {
        let json = r#"{"accessToken":"a1","refreshToken":"r1"}"#;
        let tokens: AuthTokens = serde_json::from_str(json).expect("valid tokens");
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 0);
    }

    #[test]
    fn test_reset_password_wire_names() {
        let body = ResetPasswordRequest {
            token: "t".into(),
            new_password: "Secret1!".into(),
        };
        let json = serde_json::to_value(&body).expect("serializable");
        assert_eq!(json["newPassword"], "Secret1!");
    }
}
