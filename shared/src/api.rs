use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Bid, Project, Role, SessionUser};

// ============================================================================
// Auth API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub role: Role,
}

/// Completes a popup sign-in: the relayed Google ID token is exchanged
/// server-side for a session cookie.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct GoogleSessionRequest {
    #[validate(length(min = 1))]
    pub id_token: String,

    pub access_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: SessionUser,
}

// ============================================================================
// Popup Relay Message
// ============================================================================

/// Payload a sign-in popup posts to the window that opened it.
///
/// The wire shape is part of the cross-window contract: a `type` tag of
/// `GOOGLE_AUTH_SUCCESS` or `GOOGLE_AUTH_ERROR`, with camelCase token
/// fields on the success arm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuthRelayMessage {
    #[serde(rename = "GOOGLE_AUTH_SUCCESS")]
    Success {
        #[serde(rename = "idToken")]
        id_token: String,

        #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
        access_token: Option<String>,
    },

    #[serde(rename = "GOOGLE_AUTH_ERROR")]
    Error { error: String },
}

// ============================================================================
// Project / Bid API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub project: Project,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListProjectsResponse {
    pub projects: Vec<Project>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PlaceBidRequest {
    #[validate(range(min = 1))]
    pub amount_cents: i64,

    #[validate(length(max = 5000))]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BidResponse {
    pub bid: Bid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListBidsResponse {
    pub bids: Vec<Bid>,
    pub total: usize,
}

/// Terminal outcome of a confirmation link. Consumers rely on `message`
/// being present; everything else is advisory.
#[derive(Debug, Serialize, Deserialize)]
pub struct BidOutcomeResponse {
    pub message: String,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relay_success_wire_shape() {
        let msg = AuthRelayMessage::Success {
            id_token: "abc123".to_string(),
            access_token: Some("xyz".to_string()),
        };

        let value = serde_json::to_value(&msg).expect("should serialize");
        assert_eq!(
            value,
            json!({
                "type": "GOOGLE_AUTH_SUCCESS",
                "idToken": "abc123",
                "accessToken": "xyz",
            })
        );
    }

    #[test]
    fn test_relay_success_omits_absent_access_token() {
        let msg = AuthRelayMessage::Success {
            id_token: "abc123".to_string(),
            access_token: None,
        };

        let value = serde_json::to_value(&msg).expect("should serialize");
        assert_eq!(
            value,
            json!({
                "type": "GOOGLE_AUTH_SUCCESS",
                "idToken": "abc123",
            })
        );
    }

    #[test]
    fn test_relay_error_wire_shape() {
        let msg = AuthRelayMessage::Error {
            error: "No ID token received".to_string(),
        };

        let value = serde_json::to_value(&msg).expect("should serialize");
        assert_eq!(
            value,
            json!({
                "type": "GOOGLE_AUTH_ERROR",
                "error": "No ID token received",
            })
        );
    }

    #[test]
    fn test_relay_round_trips_from_wire() {
        let parsed: AuthRelayMessage = serde_json::from_str(
            r#"{"type":"GOOGLE_AUTH_SUCCESS","idToken":"tok","accessToken":"acc"}"#,
        )
        .expect("should deserialize");

        assert_eq!(
            parsed,
            AuthRelayMessage::Success {
                id_token: "tok".to_string(),
                access_token: Some("acc".to_string()),
            }
        );
    }

    #[test]
    fn test_login_request_requires_well_formed_email() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
        };
        assert!(request.validate().is_err());

        let request = LoginRequest {
            email: "client@example.com".to_string(),
            password: "longenough".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_signup_request_rejects_short_password() {
        let request = SignupRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "short".to_string(),
            role: Role::Freelancer,
        };
        assert!(request.validate().is_err());
    }
}
