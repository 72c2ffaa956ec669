// SPDX-License-Identifier: MIT

//! Client-facing order-status portal.

use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::Sale;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/my/sales", get(my_sales))
}

/// Sales recorded against the authenticated principal's email, newest
/// first. Principals without an email simply have no orders to show.
async fn my_sales(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Sale>>> {
    let Some(email) = user.email.as_deref() else {
        return Ok(Json(Vec::new()));
    };
    let sales = state.db.sales_by_client_email(email).await?;
    Ok(Json(sales))
}
