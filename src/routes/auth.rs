// SPDX-License-Identifier: MIT

//! Authentication routes: the imperative surface of the session/role
//! resolver. Each handler begins a resolution before calling the
//! provider so a slower older attempt can never clobber a newer one.

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::auth::{extract_token, SESSION_COOKIE};
use crate::models::{profile::NewProfile, sale::looks_like_email, Role};
use crate::services::session::{Session, SessionState};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signin", post(sign_in))
        .route("/auth/signup", post(sign_up))
        .route("/auth/signout", post(sign_out))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/update-password", post(update_password))
        .route("/auth/session", get(get_session))
}

// ─── Response shapes ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    pub is_admin: bool,
    pub is_admin_or_operator: bool,
}

impl SessionResponse {
    fn from_state(state: &SessionState) -> Self {
        match state.session() {
            Some(session) => Self::from_session(session),
            None => Self {
                authenticated: false,
                user: None,
                is_admin: false,
                is_admin_or_operator: false,
            },
        }
    }

    fn from_session(session: &Session) -> Self {
        Self {
            authenticated: true,
            user: Some(SessionUser {
                id: session.user_id,
                email: session.email.clone(),
                full_name: session.full_name.clone(),
                role: session.role,
            }),
            is_admin: session.is_admin(),
            is_admin_or_operator: session.is_admin_or_operator(),
        }
    }
}

#[derive(Serialize)]
pub struct SignInResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(flatten)]
    pub session: SessionResponse,
}

// ─── Sign in ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SignInRequest>,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    let email = body.email.trim();
    if !looks_like_email(email) {
        return Err(AppError::BadRequest("a valid email is required".into()));
    }
    if body.password.is_empty() {
        return Err(AppError::BadRequest("password is required".into()));
    }

    let seq = state.session.begin();
    let provider_session = match state.auth.sign_in(email, &body.password).await {
        Ok(session) => session,
        Err(e) => {
            // Invalid credentials leave the snapshot anonymous.
            state.session.apply(seq, SessionState::Anonymous);
            return Err(e);
        }
    };

    let resolved = state
        .session
        .complete(seq, &state.db, &provider_session.user)
        .await;

    tracing::info!(user_id = %provider_session.user.id, "Sign-in resolved");

    let jar = match &provider_session.access_token {
        Some(token) => jar.add(session_cookie(token, provider_session.expires_in)),
        None => jar,
    };
    Ok((
        jar,
        Json(SignInResponse {
            access_token: provider_session.access_token,
            session: SessionResponse::from_state(&resolved),
        }),
    ))
}

// ─── Sign up ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<SignUpRequest>,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    let email = body.email.trim();
    let full_name = body.full_name.trim();
    if !looks_like_email(email) {
        return Err(AppError::BadRequest("a valid email is required".into()));
    }
    if body.password.len() < 6 {
        return Err(AppError::BadRequest(
            "password must be at least 6 characters".into(),
        ));
    }
    if full_name.len() < 2 {
        return Err(AppError::BadRequest("full_name is required".into()));
    }

    let seq = state.session.begin();
    let provider_session = match state.auth.sign_up(email, &body.password, full_name).await {
        Ok(session) => session,
        Err(e) => {
            state.session.apply(seq, SessionState::Anonymous);
            return Err(e);
        }
    };

    // Follow-up profile insert. There is no transaction with the
    // principal creation; on failure the principal still exists and
    // role resolution falls back to the client default, so we log and
    // keep going rather than attempting a rollback.
    let profile = NewProfile {
        id: provider_session.user.id,
        full_name: Some(full_name.to_string()),
        role: Role::Client,
    };
    if let Err(e) = state.db.insert_profile(&profile).await {
        tracing::warn!(
            user_id = %provider_session.user.id,
            error = %e,
            "Profile insert after sign-up failed; continuing with client default"
        );
    }

    let resolved = state
        .session
        .complete(seq, &state.db, &provider_session.user)
        .await;

    tracing::info!(user_id = %provider_session.user.id, "Sign-up resolved");

    let jar = match &provider_session.access_token {
        Some(token) => jar.add(session_cookie(token, provider_session.expires_in)),
        None => jar,
    };
    Ok((
        jar,
        Json(SignInResponse {
            access_token: provider_session.access_token,
            session: SessionResponse::from_state(&resolved),
        }),
    ))
}

// ─── Sign out ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SignOutResponse {
    pub success: bool,
}

/// Idempotent: clears the provider session when a token is present and
/// always leaves the snapshot anonymous.
async fn sign_out(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (CookieJar, Json<SignOutResponse>) {
    if let Some(token) = extract_token(&jar, &headers) {
        state.auth.sign_out(&token).await;
    }
    state.session.signed_out();

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(SignOutResponse { success: true }))
}

// ─── Password recovery ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Sends a recovery link. The response is identical whether or not the
/// address has an account; the provider does not reveal that either.
async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<SignOutResponse>> {
    let email = body.email.trim();
    if !looks_like_email(email) {
        return Err(AppError::BadRequest("a valid email is required".into()));
    }
    state
        .auth
        .send_reset_email(email, &state.config.password_reset_redirect)
        .await?;
    Ok(Json(SignOutResponse { success: true }))
}

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

/// Requires the recovery (or normal) session token from the caller.
async fn update_password(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<Json<SignOutResponse>> {
    let token = extract_token(&jar, &headers).ok_or(AppError::Unauthorized)?;
    if body.password.len() < 6 {
        return Err(AppError::BadRequest(
            "password must be at least 6 characters".into(),
        ));
    }
    state.auth.update_password(&token, &body.password).await?;
    Ok(Json(SignOutResponse { success: true }))
}

// ─── Session snapshot ────────────────────────────────────────────

/// Resolve the presented token (if any) through the resolver and return
/// the snapshot the UI keys its navigation off.
async fn get_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let token = extract_token(&jar, &headers);
    let resolved = state
        .session
        .resolve_token(&state.auth, &state.db, token.as_deref())
        .await;
    Json(SessionResponse::from_state(&resolved))
}

fn session_cookie(token: &str, expires_in: Option<u64>) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    if let Some(seconds) = expires_in {
        cookie.set_max_age(time::Duration::seconds(seconds as i64));
    }
    cookie
}
