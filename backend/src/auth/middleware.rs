//! Authentication middleware layer for protecting routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use shared::api::ErrorResponse;

use crate::error::ApiError;
use crate::AppState;

use super::jwt;
use super::types::{AuthConfig, AuthUser, Claims};

/// Middleware function that requires authentication.
///
/// Used with `axum::middleware::from_fn_with_state`. On success the
/// validated [`AuthUser`] is inserted as a request extension for handlers
/// to consume.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let config = &state.auth_config;

    // Try to get token from cookie first, then Authorization header
    let token = extract_token_from_cookie(request.headers(), &config.cookie_name)
        .or_else(|| extract_token_from_header(request.headers()));

    let token = match token {
        Some(t) => t,
        None => return unauthorized("Missing authentication"),
    };

    let claims = match jwt::validate_token(config, &token) {
        Ok(c) => c,
        Err(_) => return unauthorized("Invalid or expired token"),
    };

    request.extensions_mut().insert(AuthUser {
        email: claims.sub.clone(),
        name: claims.name.clone(),
        role: claims.role,
    });

    let response = next.run(request).await;

    // Re-issue the cookie on responses for tokens past the refresh age
    if jwt::should_refresh(&claims) {
        if let Ok(new_token) = jwt::create_token(config, &claims.sub, &claims.name, claims.role) {
            let cookie =
                build_auth_cookie(&config.cookie_name, &new_token, config.token_duration_days);
            let (mut parts, body) = response.into_parts();
            if let Ok(cookie_value) = cookie.parse() {
                parts.headers.insert(header::SET_COOKIE, cookie_value);
            }
            return Response::from_parts(parts, body);
        }
    }

    response
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
            details: None,
        }),
    )
        .into_response()
}

fn extract_token_from_cookie(headers: &axum::http::HeaderMap, cookie_name: &str) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    for cookie_str in cookie_header.split(';') {
        if let Ok(cookie) = cookie::Cookie::parse(cookie_str.trim()) {
            if cookie.name() == cookie_name {
                return Some(cookie.value().to_string());
            }
        }
    }

    None
}

fn extract_token_from_header(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Build an auth cookie string.
pub fn build_auth_cookie(name: &str, value: &str, days: i64) -> String {
    let max_age = days * 24 * 60 * 60;
    let secure = if std::env::var("RUST_ENV").unwrap_or_default() == "production" {
        "; Secure"
    } else {
        ""
    };
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}",
        name, value, max_age, secure
    )
}

/// Build a cookie string that clears the auth cookie.
pub fn clear_auth_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}

/// Extract and validate user from request headers.
///
/// For handlers outside the `require_auth` layer that still need the
/// caller's identity (e.g. session restore).
pub fn extract_auth_user(
    headers: &axum::http::HeaderMap,
    config: &AuthConfig,
) -> Result<AuthUser, ApiError> {
    let token = extract_token_from_cookie(headers, &config.cookie_name)
        .or_else(|| extract_token_from_header(headers))
        .ok_or_else(|| ApiError::Unauthorized("Missing authentication".to_string()))?;

    let claims: Claims = jwt::validate_token(config, &token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    Ok(AuthUser {
        email: claims.sub,
        name: claims.name,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;
    use shared::models::Role;

    #[test]
    fn test_build_auth_cookie_attributes() {
        let cookie = build_auth_cookie("auth_token", "tok", 7);
        assert!(cookie.starts_with("auth_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[test]
    fn test_clear_auth_cookie_expires_immediately() {
        let cookie = clear_auth_cookie("auth_token");
        assert!(cookie.starts_with("auth_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_token_prefers_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "other=1; auth_token=from-cookie".parse().unwrap(),
        );
        headers.insert(
            header::AUTHORIZATION,
            "Bearer from-header".parse().unwrap(),
        );

        let token = extract_token_from_cookie(&headers, "auth_token")
            .or_else(|| extract_token_from_header(&headers));
        assert_eq!(token.as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_extract_token_falls_back_to_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            "Bearer from-header".parse().unwrap(),
        );

        let token = extract_token_from_cookie(&headers, "auth_token")
            .or_else(|| extract_token_from_header(&headers));
        assert_eq!(token.as_deref(), Some("from-header"));
    }

    #[test]
    fn test_extract_auth_user_round_trip() {
        let config = AuthConfig {
            jwt_secret: "test-secret-key-for-testing-only".to_string(),
            token_duration_days: 7,
            cookie_name: "auth_token".to_string(),
            google_client_id: "test".to_string(),
        };
        let token = jwt::create_token(&config, "test@example.com", "Test User", Role::Admin)
            .expect("should create token");

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            format!("auth_token={}", token).parse().unwrap(),
        );

        let user = extract_auth_user(&headers, &config).expect("should extract user");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.role, Role::Admin);

        headers.clear();
        assert!(extract_auth_user(&headers, &config).is_err());
    }
}
