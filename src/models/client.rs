// SPDX-License-Identifier: MIT

//! Client registry models.

use crate::models::sale::{looks_like_email, non_empty};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row in the `clients` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update payload for a client record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInput {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ClientInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.full_name.trim().len() < 2 {
            return Err("full_name must be at least 2 characters".into());
        }
        if self.full_name.len() > 100 {
            return Err("full_name must be at most 100 characters".into());
        }
        if let Some(email) = non_empty(&self.email) {
            if !looks_like_email(email) {
                return Err("email is not a valid email address".into());
            }
        }
        if let Some(phone) = non_empty(&self.phone) {
            if phone.len() > 20 {
                return Err("phone must be at most 20 characters".into());
            }
        }
        if let Some(notes) = non_empty(&self.notes) {
            if notes.len() > 500 {
                return Err("notes must be at most 500 characters".into());
            }
        }
        Ok(())
    }
}
