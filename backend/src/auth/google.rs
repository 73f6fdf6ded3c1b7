//! Google ID-token verification.
//!
//! The popup flow relays a Google ID token to the opener, which hands it to
//! `POST /api/auth/google`. The token is checked against Google's
//! `tokeninfo` endpoint rather than trusted as presented; the endpoint
//! itself rejects expired or malformed tokens, and the audience and
//! email-verification checks happen here.

use serde::Deserialize;
use thiserror::Error;

use crate::error::ApiError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

#[derive(Debug, Error)]
pub enum GoogleAuthError {
    #[error("Google rejected the ID token")]
    TokenRejected,

    #[error("ID token was issued for a different client")]
    AudienceMismatch,

    #[error("Google account email is not verified")]
    UnverifiedEmail,

    #[error("Failed to reach Google token endpoint: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<GoogleAuthError> for ApiError {
    fn from(err: GoogleAuthError) -> Self {
        match err {
            GoogleAuthError::Transport(e) => {
                ApiError::Internal(anyhow::anyhow!("Token verification failed: {}", e))
            }
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

/// Claims returned by the tokeninfo endpoint. All values are strings on
/// the wire, including booleans.
#[derive(Debug, Deserialize)]
pub struct TokenInfo {
    pub aud: String,
    pub sub: String,
    pub email: String,
    pub email_verified: Option<String>,
    pub name: Option<String>,
}

/// Identity extracted from a verified ID token.
#[derive(Debug, Clone)]
pub struct VerifiedGoogleUser {
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}

/// Ask Google to introspect the ID token. A non-success status means the
/// token is invalid (expired, malformed, or revoked).
pub async fn fetch_token_info(
    client: &reqwest::Client,
    id_token: &str,
) -> Result<TokenInfo, GoogleAuthError> {
    let response = client
        .get(TOKENINFO_URL)
        .query(&[("id_token", id_token)])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GoogleAuthError::TokenRejected);
    }

    Ok(response.json().await?)
}

/// Validate introspected claims against our own OAuth client.
pub fn validate_token_info(
    info: TokenInfo,
    client_id: &str,
) -> Result<VerifiedGoogleUser, GoogleAuthError> {
    if info.aud != client_id {
        return Err(GoogleAuthError::AudienceMismatch);
    }

    if info.email_verified.as_deref() != Some("true") {
        return Err(GoogleAuthError::UnverifiedEmail);
    }

    Ok(VerifiedGoogleUser {
        subject: info.sub,
        email: info.email,
        name: info.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_info() -> TokenInfo {
        TokenInfo {
            aud: "our-client-id".to_string(),
            sub: "google-sub-1".to_string(),
            email: "user@example.com".to_string(),
            email_verified: Some("true".to_string()),
            name: Some("Test User".to_string()),
        }
    }

    #[test]
    fn test_accepts_matching_audience() {
        let verified =
            validate_token_info(token_info(), "our-client-id").expect("should validate");
        assert_eq!(verified.email, "user@example.com");
        assert_eq!(verified.subject, "google-sub-1");
    }

    #[test]
    fn test_rejects_foreign_audience() {
        let result = validate_token_info(token_info(), "someone-elses-client");
        assert!(matches!(result, Err(GoogleAuthError::AudienceMismatch)));
    }

    #[test]
    fn test_rejects_unverified_email() {
        let mut info = token_info();
        info.email_verified = Some("false".to_string());
        assert!(matches!(
            validate_token_info(info, "our-client-id"),
            Err(GoogleAuthError::UnverifiedEmail)
        ));

        let mut info = token_info();
        info.email_verified = None;
        assert!(matches!(
            validate_token_info(info, "our-client-id"),
            Err(GoogleAuthError::UnverifiedEmail)
        ));
    }
}
