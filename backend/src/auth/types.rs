//! Auth-related types and configuration.

use serde::{Deserialize, Serialize};
use shared::models::Role;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// User display name
    pub name: String,
    /// Server-assigned role
    pub role: Role,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Validated user from JWT
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Auth configuration loaded from environment
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_duration_days: i64,
    pub cookie_name: String,
    pub google_client_id: String,
}

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// Required env vars:
    /// - `JWT_SECRET`: Secret key for signing JWTs
    /// - `GOOGLE_CLIENT_ID`: OAuth client id the popup flow's ID tokens
    ///   must be issued for
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        Ok(Self {
            jwt_secret,
            token_duration_days: 7,
            cookie_name: "auth_token".to_string(),
            google_client_id: std::env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| "GOOGLE_CLIENT_ID must be set".to_string())?,
        })
    }
}
