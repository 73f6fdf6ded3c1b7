use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_allowed_origins: Option<String>,
    pub frontend_dir: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
            frontend_dir: env::var("FRONTEND_DIR").unwrap_or_else(|_| "frontend/dist".to_string()),
        })
    }
}
