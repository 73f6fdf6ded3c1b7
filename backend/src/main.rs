use anyhow::Result;
use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
pub mod error;
mod handlers;
mod store;

use crate::auth::types::AuthConfig;
use crate::config::AppConfig;
use crate::store::MarketStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MarketStore>,
    pub auth_config: Arc<AuthConfig>,
    pub http: reqwest::Client,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let auth_config = AuthConfig::from_env().map_err(anyhow::Error::msg)?;

    tracing::info!("Starting GigLink backend server");

    let state = AppState {
        store: Arc::new(MarketStore::new()),
        auth_config: Arc::new(auth_config),
        http: reqwest::Client::new(),
    };

    let app = create_app(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState, config: &AppConfig) -> Router {
    // Market routes require an authenticated session
    let market = Router::new()
        .route(
            "/api/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/api/project/:project_id/bids",
            get(handlers::list_bids).post(handlers::place_bid),
        )
        .route(
            "/api/project/:project_id/bid/:bid_id/confirm",
            post(handlers::confirm_bid),
        )
        .route(
            "/api/project/:project_id/bid/:bid_id/decline",
            post(handlers::decline_bid),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let app = Router::new()
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/google", post(auth::google_session))
        .merge(market)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(config))
        .with_state(state);

    // Serve static frontend files if the directory exists
    if std::path::Path::new(&config.frontend_dir).exists() {
        tracing::info!("Serving frontend from {}", config.frontend_dir);
        let index_path = format!("{}/index.html", config.frontend_dir);
        let serve_dir =
            ServeDir::new(&config.frontend_dir).not_found_service(ServeFile::new(&index_path));
        app.fallback_service(serve_dir)
    } else {
        tracing::info!(
            "Frontend directory not found at {}, serving API only",
            config.frontend_dir
        );
        app
    }
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Build CORS layer based on configuration.
///
/// If CORS_ALLOWED_ORIGINS is set, only those origins are allowed and
/// credentialed requests are accepted. If not set, defaults to permissive
/// CORS (for development only).
fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                tracing::warn!(
                    "CORS_ALLOWED_ORIGINS is set but empty, using permissive CORS (not recommended for production)"
                );
                CorsLayer::permissive()
            } else {
                tracing::info!("CORS configured for origins: {:?}", origins);
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                    .allow_credentials(true)
            }
        }
        None => {
            tracing::warn!(
                "CORS_ALLOWED_ORIGINS not set, using permissive CORS (not recommended for production)"
            );
            CorsLayer::permissive()
        }
    }
}
