//! Unified error handling for the backend API.
//!
//! This module provides a centralized error type that implements `IntoResponse`,
//! allowing handlers to use `?` operator naturally while returning appropriate
//! HTTP status codes and error messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::api::ErrorResponse;
use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Generic internal error
    #[error("{0}")]
    Internal(#[from] anyhow::Error),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Environment variable missing
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication required but not provided or invalid
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not permitted to access resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request conflicts with current resource state
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl ApiError {
    /// Create a not found error with a custom message
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(resource.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Create a config error for missing env vars
    pub fn missing_env(var_name: &str) -> Self {
        ApiError::Config(format!("{} environment variable must be set", var_name))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => ApiError::Conflict(err.to_string()),
            StoreError::InvalidCredential => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            StoreError::NotFound(resource) => ApiError::NotFound(resource.to_string()),
            StoreError::AlreadyDecided(_) => ApiError::Conflict(err.to_string()),
            StoreError::NotProjectOwner => ApiError::Forbidden(err.to_string()),
            StoreError::Hash(msg) => ApiError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(e.to_string()),
                )
            }
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                format!("{} not found", resource),
                None,
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                    None,
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
