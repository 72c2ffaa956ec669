// SPDX-License-Identifier: MIT

//! User/role management (admin only).
//!
//! The role-update endpoint keeps the wire contract of the original
//! serverless function: POST `{ userId, role }`, 400 when a field is
//! missing, 405 for other methods, 500 carrying the backend's message
//! on failure. Unlike the original it is not callable anonymously; the
//! admin gate in the router covers it.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Profile, Role};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/role", post(update_role))
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Profile>>> {
    Ok(Json(state.db.list_profiles().await?))
}

#[derive(Deserialize)]
pub struct RoleUpdateRequest {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

async fn update_role(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RoleUpdateRequest>,
) -> Result<Json<Profile>> {
    let (user_id, role) = match (body.user_id, body.role) {
        (Some(user_id), Some(role)) => (user_id, role),
        _ => {
            return Err(AppError::BadRequest(
                "userId and role are required".into(),
            ))
        }
    };

    let user_id: Uuid = user_id
        .parse()
        .map_err(|_| AppError::BadRequest("userId must be a UUID".into()))?;
    let role = Role::parse(&role)
        .ok_or_else(|| AppError::BadRequest(format!("unknown role '{}'", role)))?;

    // Upsert so principals without a profile row yet can still be
    // promoted; the row is created with the requested role.
    let profile = state.db.upsert_profile_role(user_id, role).await?;
    tracing::info!(user_id = %user_id, role = %role, "Role updated");
    Ok(Json(profile))
}
