use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role of an authenticated actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Freelancer,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Freelancer => write!(f, "freelancer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// Status of a bid on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Submitted,
    Confirmed,
    Declined,
}

/// Decision a client can take on a submitted bid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidAction {
    Confirm,
    Decline,
}

impl BidAction {
    /// Path segment used by the confirmation endpoints.
    pub fn as_path_segment(&self) -> &'static str {
        match self {
            BidAction::Confirm => "confirm",
            BidAction::Decline => "decline",
        }
    }
}

impl FromStr for BidAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirm" => Ok(BidAction::Confirm),
            "decline" => Ok(BidAction::Decline),
            _ => Err(()),
        }
    }
}

/// The currently authenticated actor, as reported by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Project posted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub client_email: String,
    pub created_at: DateTime<Utc>,
}

/// Bid placed by a freelancer on a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: Uuid,
    pub project_id: Uuid,
    pub freelancer_email: String,
    pub amount_cents: i64,
    pub message: Option<String>,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Freelancer).unwrap(), "\"freelancer\"");
        assert_eq!(serde_json::from_str::<Role>("\"admin\"").unwrap(), Role::Admin);
    }

    #[test]
    fn test_bid_action_from_query_value() {
        assert_eq!("confirm".parse::<BidAction>().unwrap(), BidAction::Confirm);
        assert_eq!("decline".parse::<BidAction>().unwrap(), BidAction::Decline);
        assert!("approve".parse::<BidAction>().is_err());
        assert!("".parse::<BidAction>().is_err());
    }

    #[test]
    fn test_bid_action_path_segments() {
        assert_eq!(BidAction::Confirm.as_path_segment(), "confirm");
        assert_eq!(BidAction::Decline.as_path_segment(), "decline");
    }
}
