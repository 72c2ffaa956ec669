// SPDX-License-Identifier: MIT

//! GoTrue identity provider client.
//!
//! Covers the provider operations the application consumes:
//! sign-in-with-password, sign-up, sign-out, send-password-reset-email,
//! update-password and get-user. Credentials are never persisted here;
//! the provider owns them.

use crate::error::AppError;
use crate::models::Role;
use serde::Deserialize;
use serde_json::json;

/// Identity provider client.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    /// None means offline mock mode (tests).
    base_url: Option<String>,
    anon_key: String,
}

/// Principal as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: uuid::Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// Display name carried in provider metadata, if any.
    pub fn full_name(&self) -> Option<String> {
        self.user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    /// Role carried in provider metadata. Unknown or absent values map
    /// to `client`.
    pub fn metadata_role(&self) -> Role {
        Role::from_provider(self.user_metadata.get("role").and_then(|v| v.as_str()))
    }
}

/// Session issued by the provider after sign-in or sign-up.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Provider error body; GoTrue is not consistent about the field name.
#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Some(base_url.trim_end_matches('/').to_string()),
            anon_key: anon_key.to_string(),
        }
    }

    /// Offline client for tests; every provider call fails.
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            anon_key: "test-anon-key".to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<String, AppError> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            AppError::Supabase("auth provider not configured (offline mode)".to_string())
        })?;
        Ok(format!("{}/auth/v1{}", base, path))
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let url = self.endpoint("/token?grant_type=password")?;
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST
            || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(AppError::Auth(Self::error_message(response).await));
        }
        Self::parse_json(response).await
    }

    /// Register a new principal. The display name and the default
    /// `client` role travel in user metadata, matching what the profile
    /// trigger expects on the backend.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthSession, AppError> {
        let url = self.endpoint("/signup")?;
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name, "role": Role::Client.as_str() },
            }))
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;

        // Duplicate email and password-policy violations come back 4xx.
        if response.status().is_client_error() {
            return Err(AppError::Auth(Self::error_message(response).await));
        }
        Self::parse_json(response).await
    }

    /// Invalidate the provider session for a token. Always succeeds from
    /// the caller's point of view; signing out twice is a no-op.
    pub async fn sign_out(&self, access_token: &str) {
        let Ok(url) = self.endpoint("/logout") else {
            return;
        };
        let result = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await;
        if let Err(e) = result {
            tracing::debug!(error = %e, "Provider sign-out failed (ignored)");
        }
    }

    /// Send a password recovery email. The provider responds identically
    /// whether or not the address has an account.
    pub async fn send_reset_email(&self, email: &str, redirect_to: &str) -> Result<(), AppError> {
        let url = format!(
            "{}?redirect_to={}",
            self.endpoint("/recover")?,
            urlencoding::encode(redirect_to)
        );
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;
        Self::check_ok(response).await
    }

    /// Update the credential for the principal holding `access_token`
    /// (a normal session or a recovery-link session).
    pub async fn update_password(
        &self,
        access_token: &str,
        new_password: &str,
    ) -> Result<AuthUser, AppError> {
        let url = self.endpoint("/user")?;
        let response = self
            .http
            .put(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .json(&json!({ "password": new_password }))
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::InvalidToken);
        }
        if response.status().is_client_error() {
            return Err(AppError::Auth(Self::error_message(response).await));
        }
        Self::parse_json(response).await
    }

    /// Fetch the principal for an access token (get-current-session).
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, AppError> {
        let url = self.endpoint("/user")?;
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::InvalidToken);
        }
        Self::parse_json(response).await
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            return Err(AppError::Supabase(Self::error_message(response).await));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Supabase(format!("malformed provider response: {}", e)))
    }

    async fn check_ok(response: reqwest::Response) -> Result<(), AppError> {
        if !response.status().is_success() {
            return Err(AppError::Supabase(Self::error_message(response).await));
        }
        Ok(())
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ProviderError>().await {
            Ok(body) => body
                .error_description
                .or(body.msg)
                .or(body.message)
                .unwrap_or_else(|| format!("provider returned {}", status)),
            Err(_) => format!("provider returned {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_metadata(metadata: serde_json::Value) -> AuthUser {
        AuthUser {
            id: uuid::Uuid::new_v4(),
            email: Some("ana@example.com".to_string()),
            user_metadata: metadata,
        }
    }

    #[test]
    fn metadata_role_defaults_to_client() {
        let user = user_with_metadata(serde_json::json!({}));
        assert_eq!(user.metadata_role(), Role::Client);

        let user = user_with_metadata(serde_json::json!({ "role": "manager" }));
        assert_eq!(user.metadata_role(), Role::Client);

        let user = user_with_metadata(serde_json::json!({ "role": "admin" }));
        assert_eq!(user.metadata_role(), Role::Admin);
    }

    #[tokio::test]
    async fn offline_client_surfaces_provider_error() {
        let auth = AuthClient::new_mock();
        let err = auth.sign_in("a@b.com", "secret123").await.unwrap_err();
        assert!(matches!(err, AppError::Supabase(_)));
    }

    #[tokio::test]
    async fn offline_sign_out_is_a_no_op() {
        let auth = AuthClient::new_mock();
        auth.sign_out("whatever").await;
        auth.sign_out("whatever").await;
    }
}
