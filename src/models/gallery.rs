// SPDX-License-Identifier: MIT

//! Gallery and gallery-image models.

use crate::models::sale::non_empty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row in the `galleries` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gallery {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Row in the `gallery_images` table. `url` points at a public object in
/// the storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: Uuid,
    pub gallery_id: Uuid,
    pub url: String,
    pub alt_text: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

/// Create/update payload for a gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Omitted on insert so the column default applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl GalleryInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().len() < 2 {
            return Err("name must be at least 2 characters".into());
        }
        if self.name.len() > 100 {
            return Err("name must be at most 100 characters".into());
        }
        if let Some(description) = non_empty(&self.description) {
            if description.len() > 500 {
                return Err("description must be at most 500 characters".into());
            }
        }
        Ok(())
    }
}

/// Update payload for an existing image (caption or ordering).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImageUpdate {
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub display_order: Option<i32>,
}
