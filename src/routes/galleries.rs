// SPDX-License-Identifier: MIT

//! Gallery management (staff) and the public gallery listing the
//! marketing site renders from.
//!
//! Deleting a gallery cascades: backing storage objects first, then the
//! image rows, then the gallery row itself.

use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Gallery, GalleryImage, GalleryInput};
use crate::models::gallery::GalleryImageUpdate;
use crate::routes::clients::DeleteResponse;
use crate::AppState;

/// Read-only routes for the marketing site.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/galleries", get(list_galleries))
        .route("/api/galleries/{id}/images", get(list_images))
}

/// Staff routes for gallery management.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/admin/galleries",
            get(list_galleries).post(create_gallery),
        )
        .route(
            "/api/admin/galleries/{id}",
            put(update_gallery).delete(delete_gallery),
        )
        .route(
            "/api/admin/galleries/{id}/images",
            get(list_images).post(upload_image),
        )
        .route(
            "/api/admin/images/{id}",
            put(update_image).delete(delete_image),
        )
}

async fn list_galleries(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Gallery>>> {
    Ok(Json(state.db.list_galleries().await?))
}

async fn list_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<GalleryImage>>> {
    Ok(Json(state.db.list_gallery_images(id).await?))
}

async fn create_gallery(
    State(state): State<Arc<AppState>>,
    Json(input): Json<GalleryInput>,
) -> Result<Json<Gallery>> {
    input.validate().map_err(AppError::BadRequest)?;
    let gallery = state.db.insert_gallery(&input).await?;
    tracing::info!(gallery_id = %gallery.id, name = %gallery.name, "Gallery created");
    Ok(Json(gallery))
}

async fn update_gallery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<GalleryInput>,
) -> Result<Json<Gallery>> {
    input.validate().map_err(AppError::BadRequest)?;
    let gallery = state
        .db
        .update_gallery(id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("gallery {}", id)))?;
    Ok(Json(gallery))
}

/// Cascade delete: storage objects, image rows, gallery row.
async fn delete_gallery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    let images = state.db.list_gallery_images(id).await?;
    let paths: Vec<String> = images
        .iter()
        .filter_map(|image| state.storage.object_path_from_url(&image.url))
        .collect();

    state.storage.remove_all(paths).await;
    state.db.delete_images_for_gallery(id).await?;
    state.db.delete_gallery(id).await?;

    tracing::info!(gallery_id = %id, image_count = images.len(), "Gallery deleted");
    Ok(Json(DeleteResponse { success: true }))
}

// ─── Images ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Multipart upload: stores the object, then inserts the image row
/// pointing at its public URL. Display order appends to the end.
async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path(gallery_id): Path<Uuid>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<GalleryImage>> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;
    let mut alt_text = query.alt_text;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("upload failed: {}", e)))?;
                upload = Some((filename, content_type, bytes.to_vec()));
            }
            Some("alt_text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("malformed field: {}", e)))?;
                if !text.is_empty() {
                    alt_text = Some(text);
                }
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) =
        upload.ok_or_else(|| AppError::BadRequest("missing 'file' field".into()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("uploaded file is empty".into()));
    }

    let extension = filename.rsplit_once('.').map_or("bin", |(_, ext)| ext);
    let object_path = format!("{}/{}.{}", gallery_id, Uuid::new_v4(), extension);
    let url = state
        .storage
        .upload(&object_path, bytes, &content_type)
        .await?;

    let display_order = next_display_order(&state.db.list_gallery_images(gallery_id).await?);
    let image = state
        .db
        .insert_image(gallery_id, &url, alt_text.as_deref(), display_order)
        .await?;

    tracing::info!(gallery_id = %gallery_id, image_id = %image.id, "Image uploaded");
    Ok(Json(image))
}

/// One past the highest existing order. Gaps left by deletions are not
/// reused.
fn next_display_order(images: &[GalleryImage]) -> i32 {
    images
        .iter()
        .map(|image| image.display_order)
        .max()
        .map_or(0, |highest| highest + 1)
}

async fn update_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<GalleryImageUpdate>,
) -> Result<Json<GalleryImage>> {
    let mut patch = serde_json::Map::new();
    if let Some(alt_text) = update.alt_text {
        patch.insert("alt_text".into(), json!(alt_text));
    }
    if let Some(display_order) = update.display_order {
        patch.insert("display_order".into(), json!(display_order));
    }
    if patch.is_empty() {
        return Err(AppError::BadRequest("nothing to update".into()));
    }

    let image = state
        .db
        .update_image(id, &serde_json::Value::Object(patch))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("image {}", id)))?;
    Ok(Json(image))
}

/// Delete a single image: backing object first, then the row.
async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>> {
    let image = state
        .db
        .get_image(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("image {}", id)))?;

    if let Some(path) = state.storage.object_path_from_url(&image.url) {
        if let Err(e) = state.storage.remove(&path).await {
            tracing::warn!(image_id = %id, error = %e, "Failed to delete storage object");
        }
    }
    state.db.delete_image(id).await?;

    tracing::info!(image_id = %id, "Image deleted");
    Ok(Json(DeleteResponse { success: true }))
}
