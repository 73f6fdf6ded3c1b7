//! Authentication HTTP handlers.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use shared::api::{GoogleSessionRequest, LoginRequest, SessionResponse, SignupRequest};
use shared::models::{Role, SessionUser};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::middleware::{build_auth_cookie, clear_auth_cookie, extract_auth_user};
use super::{google, jwt};

/// Log in with email and password.
///
/// Verifies the credential against the user store and sets the session
/// cookie on success.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let user = state
        .store
        .verify_credentials(&payload.email, &payload.password)
        .await?;

    tracing::info!("Successful login for: {}", user.email);
    issue_session(&state, StatusCode::OK, user)
}

/// Register a new account and log it in.
///
/// Email uniqueness is enforced by the store; the requested role is
/// restricted to the client-assignable set.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    if payload.role == Role::Admin {
        return Err(ApiError::bad_request("Role must be client or freelancer"));
    }

    let user = state
        .store
        .create_user(&payload.name, &payload.email, &payload.password, payload.role)
        .await?;

    tracing::info!("New signup: {} ({})", user.email, user.role);
    issue_session(&state, StatusCode::CREATED, user)
}

/// Complete a Google popup sign-in.
///
/// The relayed ID token is verified against Google before any account is
/// resolved; role assignment stays server-side.
pub async fn google_session(
    State(state): State<AppState>,
    Json(payload): Json<GoogleSessionRequest>,
) -> ApiResult<Response> {
    payload.validate()?;

    let info = google::fetch_token_info(&state.http, &payload.id_token).await?;
    let verified = google::validate_token_info(info, &state.auth_config.google_client_id)?;

    tracing::info!("Google sign-in for: {}", verified.email);

    let user = state
        .store
        .find_or_create_google_user(&verified.email, verified.name.as_deref(), &verified.subject)
        .await?;

    issue_session(&state, StatusCode::OK, user)
}

/// Get current authenticated user info.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SessionResponse>> {
    let auth_user = extract_auth_user(&headers, &state.auth_config)?;

    let user = state
        .store
        .get_user_by_email(&auth_user.email)
        .await
        .ok_or_else(|| ApiError::Unauthorized("Session user no longer exists".to_string()))?;

    Ok(Json(SessionResponse { user }))
}

/// Logout - clear auth cookie. Idempotent; succeeds with or without an
/// active session.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_auth_cookie(&state.auth_config.cookie_name);

    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

fn issue_session(state: &AppState, status: StatusCode, user: SessionUser) -> ApiResult<Response> {
    let token = jwt::create_token(&state.auth_config, &user.email, &user.name, user.role)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to create token: {}", e)))?;

    let cookie = build_auth_cookie(
        &state.auth_config.cookie_name,
        &token,
        state.auth_config.token_duration_days,
    );

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse { user }),
    )
        .into_response())
}
