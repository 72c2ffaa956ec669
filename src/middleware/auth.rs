// SPDX-License-Identifier: MIT

//! Request authentication and role gates.
//!
//! Access tokens are Supabase-issued HS256 JWTs, verified locally with
//! the project's JWT secret. The app-level role is re-read from the
//! profile store on every request; a failed lookup strips the role
//! (leaving the request authenticated but unauthorized for staff
//! screens) rather than signing the principal out.

use crate::error::AppError;
use crate::models::Role;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Session cookie holding the provider access token.
pub const SESSION_COOKIE: &str = "angra_token";

/// Claims we care about in a Supabase access token.
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Principal id (UUID)
    pub sub: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Authenticated principal attached to the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
    /// None when the role could not be resolved this request.
    pub role: Option<Role>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(Role::is_admin)
    }

    pub fn is_admin_or_operator(&self) -> bool {
        self.role.is_some_and(Role::is_admin_or_operator)
    }
}

/// Pull the access token from the request. An explicit `Authorization`
/// header wins over the session cookie, so an API client is never
/// shadowed by a stale cookie left by a browser session.
pub fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Decode and validate a provider access token.
pub fn decode_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&["authenticated"]);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

/// Middleware that requires a valid provider access token and attaches
/// the principal (with a freshly resolved role) to the request.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token =
        extract_token(&jar, request.headers()).ok_or(AppError::Unauthorized)?;
    let claims = decode_token(&token, &state.config.supabase_jwt_secret)?;
    let user_id: Uuid = claims.sub.parse().map_err(|_| AppError::InvalidToken)?;

    // Fresh read per transition; no role caching.
    let role = match state.db.get_profile(user_id).await {
        Ok(Some(profile)) => Some(profile.role),
        Ok(None) => Some(Role::from_provider(
            claims.user_metadata.get("role").and_then(|v| v.as_str()),
        )),
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Role lookup failed; treating request as unprivileged");
            None
        }
    };

    request.extensions_mut().insert(CurrentUser {
        id: user_id,
        email: claims.email,
        role,
    });

    Ok(next.run(request).await)
}

/// Gate for staff screens: role must be admin or operator.
pub async fn require_staff(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    if !user.is_admin_or_operator() {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Gate for user/role management: admin only.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(request).await)
}
