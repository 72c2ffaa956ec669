// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! The Supabase keys are injected by the deployment environment; nothing
//! here is fetched at runtime beyond process start.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Supabase project (no trailing slash)
    pub supabase_url: String,
    /// Public (anon) API key, used for identity operations
    pub supabase_anon_key: String,
    /// Service-role key, used for data and storage operations
    pub supabase_service_role_key: String,
    /// Shared secret the provider signs access tokens with
    pub supabase_jwt_secret: String,
    /// Frontend URL for CORS and password-reset redirects
    pub frontend_url: String,
    /// Where the provider's recovery link lands
    pub password_reset_redirect: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let password_reset_redirect = env::var("PASSWORD_RESET_REDIRECT_URL")
            .unwrap_or_else(|_| format!("{}/admin/reset", frontend_url));

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")
                .map_err(|_| ConfigError::Missing("SUPABASE_ANON_KEY"))?,
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY")
                .map_err(|_| ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?,
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .map_err(|_| ConfigError::Missing("SUPABASE_JWT_SECRET"))?,
            frontend_url,
            password_reset_redirect,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Fixed config for tests; no live backend behind it.
    pub fn test_default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_role_key: "test-service-key".to_string(),
            supabase_jwt_secret: "test-jwt-secret-at-least-32-bytes!".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            password_reset_redirect: "http://localhost:5173/admin/reset".to_string(),
            port: 8080,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
