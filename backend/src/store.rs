//! In-memory market store.
//!
//! Process-wide state for users, projects, and bids behind a single async
//! lock, so credential checks and bid decisions never observe a partially
//! updated record. The durable part of a session is the JWT cookie; nothing
//! here touches disk.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::models::{Bid, BidAction, BidStatus, Project, Role, SessionUser};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("An account with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredential,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Bid already {0}")]
    AlreadyDecided(&'static str),

    #[error("Only the project owner may respond to its bids")]
    NotProjectOwner,

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Stored user record. `password_hash` is an argon2 PHC string; absent for
/// accounts created through Google sign-in.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    password_hash: Option<String>,
    pub google_subject: Option<String>,
}

impl UserRecord {
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Default)]
struct Inner {
    /// Keyed by lowercased email.
    users: HashMap<String, UserRecord>,
    projects: HashMap<Uuid, Project>,
    bids: HashMap<Uuid, Bid>,
}

pub struct MarketStore {
    inner: RwLock<Inner>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Register a new password-based account. Email uniqueness is enforced
    /// here; the caller decides which roles are assignable.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<SessionUser, StoreError> {
        let key = email.trim().to_lowercase();
        let password_hash = hash_password(password)?;

        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&key) {
            return Err(StoreError::DuplicateEmail(key));
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: key.clone(),
            role,
            password_hash: Some(password_hash),
            google_subject: None,
        };
        let user = record.session_user();
        inner.users.insert(key, record);
        Ok(user)
    }

    /// Check an email/password pair. A missing account and a wrong password
    /// are indistinguishable to the caller.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, StoreError> {
        let key = email.trim().to_lowercase();
        let inner = self.inner.read().await;

        let record = inner.users.get(&key).ok_or(StoreError::InvalidCredential)?;
        let hash = record
            .password_hash
            .as_deref()
            .ok_or(StoreError::InvalidCredential)?;

        if !verify_password(password, hash) {
            return Err(StoreError::InvalidCredential);
        }

        Ok(record.session_user())
    }

    /// Resolve a verified Google identity to a local account, creating one
    /// with the default `client` role on first sign-in. The stored role is
    /// authoritative for returning users.
    pub async fn find_or_create_google_user(
        &self,
        email: &str,
        name: Option<&str>,
        subject: &str,
    ) -> Result<SessionUser, StoreError> {
        let key = email.trim().to_lowercase();
        let mut inner = self.inner.write().await;

        if let Some(record) = inner.users.get_mut(&key) {
            if record.google_subject.is_none() {
                record.google_subject = Some(subject.to_string());
            }
            return Ok(record.session_user());
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            name: name.unwrap_or(&key).to_string(),
            email: key.clone(),
            role: Role::Client,
            password_hash: None,
            google_subject: Some(subject.to_string()),
        };
        let user = record.session_user();
        inner.users.insert(key, record);
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<SessionUser> {
        let key = email.trim().to_lowercase();
        let inner = self.inner.read().await;
        inner.users.get(&key).map(UserRecord::session_user)
    }

    pub async fn create_project(&self, title: &str, client_email: &str) -> Project {
        let project = Project {
            id: Uuid::new_v4(),
            title: title.to_string(),
            client_email: client_email.to_lowercase(),
            created_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        inner.projects.insert(project.id, project.clone());
        project
    }

    pub async fn list_projects(&self) -> Vec<Project> {
        let inner = self.inner.read().await;
        let mut projects: Vec<Project> = inner.projects.values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        projects
    }

    pub async fn place_bid(
        &self,
        project_id: Uuid,
        freelancer_email: &str,
        amount_cents: i64,
        message: Option<String>,
    ) -> Result<Bid, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.projects.contains_key(&project_id) {
            return Err(StoreError::NotFound("Project"));
        }

        let bid = Bid {
            id: Uuid::new_v4(),
            project_id,
            freelancer_email: freelancer_email.to_lowercase(),
            amount_cents,
            message,
            status: BidStatus::Submitted,
            created_at: Utc::now(),
            decided_at: None,
        };
        inner.bids.insert(bid.id, bid.clone());
        Ok(bid)
    }

    pub async fn list_bids(&self, project_id: Uuid) -> Result<Vec<Bid>, StoreError> {
        let inner = self.inner.read().await;
        if !inner.projects.contains_key(&project_id) {
            return Err(StoreError::NotFound("Project"));
        }

        let mut bids: Vec<Bid> = inner
            .bids
            .values()
            .filter(|b| b.project_id == project_id)
            .cloned()
            .collect();
        bids.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bids)
    }

    /// Resolve a submitted bid to `confirmed` or `declined`.
    ///
    /// Only the owning client may decide, and a bid is decidable at most
    /// once; a second attempt reports the existing terminal state.
    pub async fn decide_bid(
        &self,
        project_id: Uuid,
        bid_id: Uuid,
        action: BidAction,
        acting_email: &str,
    ) -> Result<Bid, StoreError> {
        let mut inner = self.inner.write().await;

        let project = inner
            .projects
            .get(&project_id)
            .ok_or(StoreError::NotFound("Project"))?;
        if project.client_email != acting_email.to_lowercase() {
            return Err(StoreError::NotProjectOwner);
        }

        let bid = inner
            .bids
            .get_mut(&bid_id)
            .filter(|b| b.project_id == project_id)
            .ok_or(StoreError::NotFound("Bid"))?;

        match bid.status {
            BidStatus::Submitted => {}
            BidStatus::Confirmed => return Err(StoreError::AlreadyDecided("confirmed")),
            BidStatus::Declined => return Err(StoreError::AlreadyDecided("declined")),
        }

        bid.status = match action {
            BidAction::Confirm => BidStatus::Confirmed,
            BidAction::Decline => BidStatus::Declined,
        };
        bid.decided_at = Some(Utc::now());
        Ok(bid.clone())
    }
}

fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::Hash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_user(role: Role) -> (MarketStore, SessionUser) {
        let store = MarketStore::new();
        let user = store
            .create_user("Test User", "user@example.com", "correct-horse", role)
            .await
            .expect("should create user");
        (store, user)
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let (store, _) = store_with_user(Role::Client).await;

        let result = store
            .create_user("Other", "USER@example.com", "battery-staple", Role::Freelancer)
            .await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_login_verifies_password() {
        let (store, user) = store_with_user(Role::Client).await;

        let ok = store
            .verify_credentials("user@example.com", "correct-horse")
            .await
            .expect("should verify");
        assert_eq!(ok.id, user.id);

        let err = store
            .verify_credentials("user@example.com", "wrong-password")
            .await;
        assert!(matches!(err, Err(StoreError::InvalidCredential)));

        let err = store.verify_credentials("nobody@example.com", "anything").await;
        assert!(matches!(err, Err(StoreError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_google_signin_keeps_stored_role() {
        let (store, _) = store_with_user(Role::Freelancer).await;

        let user = store
            .find_or_create_google_user("user@example.com", Some("Renamed"), "sub-1")
            .await
            .expect("should resolve");
        assert_eq!(user.role, Role::Freelancer);

        let created = store
            .find_or_create_google_user("new@example.com", Some("New User"), "sub-2")
            .await
            .expect("should create");
        assert_eq!(created.role, Role::Client);
    }

    #[tokio::test]
    async fn test_decide_bid_happy_path() {
        let (store, client) = store_with_user(Role::Client).await;
        let project = store.create_project("Build a site", &client.email).await;
        let bid = store
            .place_bid(project.id, "dev@example.com", 50_000, None)
            .await
            .expect("should place bid");

        let decided = store
            .decide_bid(project.id, bid.id, BidAction::Confirm, &client.email)
            .await
            .expect("should confirm");
        assert_eq!(decided.status, BidStatus::Confirmed);
        assert!(decided.decided_at.is_some());
    }

    #[tokio::test]
    async fn test_decide_bid_is_terminal() {
        let (store, client) = store_with_user(Role::Client).await;
        let project = store.create_project("Build a site", &client.email).await;
        let bid = store
            .place_bid(project.id, "dev@example.com", 50_000, None)
            .await
            .expect("should place bid");

        store
            .decide_bid(project.id, bid.id, BidAction::Decline, &client.email)
            .await
            .expect("should decline");

        let second = store
            .decide_bid(project.id, bid.id, BidAction::Confirm, &client.email)
            .await;
        assert!(matches!(second, Err(StoreError::AlreadyDecided("declined"))));
    }

    #[tokio::test]
    async fn test_decide_bid_requires_project_owner() {
        let (store, client) = store_with_user(Role::Client).await;
        let project = store.create_project("Build a site", &client.email).await;
        let bid = store
            .place_bid(project.id, "dev@example.com", 50_000, None)
            .await
            .expect("should place bid");

        let result = store
            .decide_bid(project.id, bid.id, BidAction::Confirm, "dev@example.com")
            .await;
        assert!(matches!(result, Err(StoreError::NotProjectOwner)));
    }

    #[tokio::test]
    async fn test_decide_bid_unknown_ids() {
        let (store, client) = store_with_user(Role::Client).await;
        let project = store.create_project("Build a site", &client.email).await;

        let result = store
            .decide_bid(project.id, Uuid::new_v4(), BidAction::Confirm, &client.email)
            .await;
        assert!(matches!(result, Err(StoreError::NotFound("Bid"))));

        let result = store
            .decide_bid(Uuid::new_v4(), Uuid::new_v4(), BidAction::Confirm, &client.email)
            .await;
        assert!(matches!(result, Err(StoreError::NotFound("Project"))));
    }

    #[tokio::test]
    async fn test_bid_from_another_project_is_not_visible() {
        let (store, client) = store_with_user(Role::Client).await;
        let project_a = store.create_project("Site A", &client.email).await;
        let project_b = store.create_project("Site B", &client.email).await;
        let bid = store
            .place_bid(project_a.id, "dev@example.com", 10_000, None)
            .await
            .expect("should place bid");

        let result = store
            .decide_bid(project_b.id, bid.id, BidAction::Confirm, &client.email)
            .await;
        assert!(matches!(result, Err(StoreError::NotFound("Bid"))));
    }
}
