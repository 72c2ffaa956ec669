// SPDX-License-Identifier: MIT

//! Client registry screen (staff).

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ClientInput, ClientRecord};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/clients", get(list_clients).post(create_client))
        .route(
            "/api/admin/clients/{id}",
            put(update_client).delete(delete_client),
        )
}

#[derive(Deserialize)]
pub struct ClientListQuery {
    /// Free-text filter on the client name.
    #[serde(default)]
    pub search: Option<String>,
}

async fn list_clients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Vec<ClientRecord>>> {
    if let Some(search) = &query.search {
        if search.len() > 100 {
            return Err(AppError::BadRequest("search term too long".into()));
        }
    }
    let clients = state.db.list_clients(query.search.as_deref()).await?;
    Ok(Json(clients))
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ClientInput>,
) -> Result<Json<ClientRecord>> {
    input.validate().map_err(AppError::BadRequest)?;
    let client = state.db.insert_client(&input).await?;
    tracing::info!(client_id = %client.id, "Client created");
    Ok(Json(client))
}

async fn update_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<ClientInput>,
) -> Result<Json<ClientRecord>> {
    input.validate().map_err(AppError::BadRequest)?;
    let client = state
        .db
        .update_client(id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("client {}", id)))?;
    Ok(Json(client))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

async fn delete_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    state.db.delete_client(id).await?;
    tracing::info!(client_id = %id, "Client deleted");
    Ok(Json(DeleteResponse { success: true }))
}
