use gloo_net::http::{Request, Response};
use serde::Deserialize;
use web_sys::{AbortSignal, RequestCredentials};

use shared::api::{
    BidOutcomeResponse, GoogleSessionRequest, ListProjectsResponse, LoginRequest,
    SessionResponse, SignupRequest,
};
use shared::models::{BidAction, Project, Role, SessionUser};

const API_BASE_URL: &str = "/api";

/// Error from the backend API, split by whether the server answered at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-success status.
    Status { code: u16, message: String },
    /// The request never completed (network failure, abort, bad payload).
    Transport(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport(message) => message.clone(),
        }
    }
}

/// Failed responses carry either a `message` or an `error` key depending
/// on which layer produced them; accept both.
#[derive(Debug, Deserialize)]
struct FailureBody {
    message: Option<String>,
    error: Option<String>,
}

pub struct ApiService;

impl ApiService {
    pub async fn login(email: &str, password: &str) -> Result<SessionUser, ApiError> {
        let response = Request::post(&format!("{}/auth/login", API_BASE_URL))
            .credentials(RequestCredentials::Include)
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .map_err(|e| ApiError::Transport(format!("Failed to serialize request: {:?}", e)))?
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {:?}", e)))?;

        session_user(response).await
    }

    pub async fn signup(
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<SessionUser, ApiError> {
        let response = Request::post(&format!("{}/auth/signup", API_BASE_URL))
            .credentials(RequestCredentials::Include)
            .json(&SignupRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role,
            })
            .map_err(|e| ApiError::Transport(format!("Failed to serialize request: {:?}", e)))?
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {:?}", e)))?;

        session_user(response).await
    }

    pub async fn google_session(
        id_token: String,
        access_token: Option<String>,
    ) -> Result<SessionUser, ApiError> {
        let response = Request::post(&format!("{}/auth/google", API_BASE_URL))
            .credentials(RequestCredentials::Include)
            .json(&GoogleSessionRequest {
                id_token,
                access_token,
            })
            .map_err(|e| ApiError::Transport(format!("Failed to serialize request: {:?}", e)))?
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {:?}", e)))?;

        session_user(response).await
    }

    pub async fn me() -> Result<SessionUser, ApiError> {
        let response = Request::get(&format!("{}/auth/me", API_BASE_URL))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {:?}", e)))?;

        session_user(response).await
    }

    pub async fn logout() -> Result<(), ApiError> {
        let response = Request::post(&format!("{}/auth/logout", API_BASE_URL))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {:?}", e)))?;

        check(response).await?;
        Ok(())
    }

    pub async fn list_projects() -> Result<Vec<Project>, ApiError> {
        let response = Request::get(&format!("{}/projects", API_BASE_URL))
            .credentials(RequestCredentials::Include)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {:?}", e)))?;

        let response = check(response).await?;
        let body: ListProjectsResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to parse response: {:?}", e)))?;
        Ok(body.projects)
    }

    /// Resolve a confirmation link. Issues exactly one `POST` to the
    /// confirm or decline endpoint for the project/bid pair, with ambient
    /// credentials; an abort signal lets the caller cancel on teardown.
    pub async fn respond_to_bid(
        project_id: &str,
        bid_id: &str,
        action: BidAction,
        signal: Option<&AbortSignal>,
    ) -> Result<BidOutcomeResponse, ApiError> {
        let url = format!(
            "{}/project/{}/bid/{}/{}",
            API_BASE_URL,
            project_id,
            bid_id,
            action.as_path_segment()
        );

        let response = Request::post(&url)
            .credentials(RequestCredentials::Include)
            .abort_signal(signal)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request failed: {:?}", e)))?;

        let response = check(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to parse response: {:?}", e)))
    }
}

async fn session_user(response: Response) -> Result<SessionUser, ApiError> {
    let response = check(response).await?;
    let body: SessionResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Transport(format!("Failed to parse response: {:?}", e)))?;
    Ok(body.user)
}

/// Map a non-success response to [`ApiError::Status`], preferring the
/// server-supplied message over a generic one.
async fn check(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }

    let code = response.status();
    let fallback = format!("HTTP error: {}", code);
    let message = match response.json::<FailureBody>().await {
        Ok(body) => body.message.or(body.error).unwrap_or(fallback),
        Err(_) => fallback,
    };

    Err(ApiError::Status { code, message })
}
