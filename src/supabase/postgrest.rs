// SPDX-License-Identifier: MIT

//! PostgREST data API client with typed table operations.
//!
//! The service talks to the data API with the service-role credential;
//! row-level security still applies to browser clients hitting the
//! backend directly. Reads in offline mock mode return empty results so
//! routing and validation can be exercised in tests; writes fail.

use crate::error::AppError;
use crate::models::{
    profile::NewProfile, ClientInput, ClientRecord, Gallery, GalleryImage, GalleryInput, Profile,
    Role, Sale, SaleInput, SaleStatus,
};
use crate::supabase::tables;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

/// Data API client.
#[derive(Clone)]
pub struct SupabaseDb {
    http: reqwest::Client,
    /// None means offline mock mode (tests).
    base_url: Option<String>,
    service_key: String,
}

/// Filters for the sales list: status equality, client-name substring
/// and an inclusive sale-date range.
#[derive(Debug, Default, Clone)]
pub struct SaleFilter {
    pub status: Option<SaleStatus>,
    pub client: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SupabaseDb {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Some(base_url.trim_end_matches('/').to_string()),
            service_key: service_key.to_string(),
        }
    }

    /// Offline client for tests.
    pub fn new_mock() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            service_key: "test-service-key".to_string(),
        }
    }

    fn offline(&self) -> bool {
        self.base_url.is_none()
    }

    fn table_url(&self, table: &str) -> Result<String, AppError> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            AppError::Supabase("database not configured (offline mode)".to_string())
        })?;
        Ok(format!("{}/rest/v1/{}", base, table))
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    // ─── Generic operations ──────────────────────────────────────

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, AppError> {
        if self.offline() {
            return Ok(Vec::new());
        }
        let response = self
            .authed(self.http.get(self.table_url(table)?).query(query))
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;
        Self::parse_rows(response).await
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let response = self
            .authed(self.http.post(self.table_url(table)?))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;
        let mut rows: Vec<T> = Self::parse_rows(response).await?;
        rows.pop()
            .ok_or_else(|| AppError::Supabase("insert returned no row".to_string()))
    }

    async fn update_by_id<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        id: Uuid,
        body: &B,
    ) -> Result<Option<T>, AppError> {
        let response = self
            .authed(
                self.http
                    .patch(self.table_url(table)?)
                    .query(&[("id", format!("eq.{}", id))]),
            )
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;
        let mut rows: Vec<T> = Self::parse_rows(response).await?;
        Ok(rows.pop())
    }

    async fn delete_where(&self, table: &str, query: &[(&str, String)]) -> Result<(), AppError> {
        let response = self
            .authed(self.http.delete(self.table_url(table)?).query(query))
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;
        Self::check_ok(response).await
    }

    async fn parse_rows<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, AppError> {
        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| AppError::Supabase(format!("malformed data response: {}", e)))
    }

    async fn check_ok(response: reqwest::Response) -> Result<(), AppError> {
        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }
        Ok(())
    }

    async fn response_error(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);
        AppError::Supabase(format!("{}: {}", status, message))
    }

    // ─── Profiles ────────────────────────────────────────────────

    /// Fetch the profile/role record for a principal, if one exists.
    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let mut rows = self
            .select::<Profile>(
                tables::PROFILES,
                &[("id", format!("eq.{}", user_id)), ("limit", "1".into())],
            )
            .await?;
        Ok(rows.pop())
    }

    /// Insert the profile row created at sign-up.
    pub async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, AppError> {
        self.insert(tables::PROFILES, profile).await
    }

    /// Set the role for a principal, creating the profile row when the
    /// principal has none yet.
    pub async fn upsert_profile_role(&self, user_id: Uuid, role: Role) -> Result<Profile, AppError> {
        let response = self
            .authed(
                self.http
                    .post(self.table_url(tables::PROFILES)?)
                    .query(&[("on_conflict", "id")]),
            )
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&json!({ "id": user_id, "role": role.as_str() }))
            .send()
            .await
            .map_err(|e| AppError::Supabase(e.to_string()))?;
        let mut rows: Vec<Profile> = Self::parse_rows(response).await?;
        rows.pop()
            .ok_or_else(|| AppError::Supabase("role update returned no row".to_string()))
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, AppError> {
        self.select(
            tables::PROFILES,
            &[("order", "created_at.desc".into()), ("select", "*".into())],
        )
        .await
    }

    // ─── Clients ─────────────────────────────────────────────────

    pub async fn list_clients(&self, search: Option<&str>) -> Result<Vec<ClientRecord>, AppError> {
        let mut query = vec![("order", "created_at.desc".to_string())];
        if let Some(term) = search {
            query.push(("full_name", format!("ilike.*{}*", term)));
        }
        self.select(tables::CLIENTS, &query).await
    }

    pub async fn insert_client(&self, input: &ClientInput) -> Result<ClientRecord, AppError> {
        self.insert(tables::CLIENTS, input).await
    }

    pub async fn update_client(
        &self,
        id: Uuid,
        input: &ClientInput,
    ) -> Result<Option<ClientRecord>, AppError> {
        self.update_by_id(tables::CLIENTS, id, input).await
    }

    pub async fn delete_client(&self, id: Uuid) -> Result<(), AppError> {
        self.delete_where(tables::CLIENTS, &[("id", format!("eq.{}", id))])
            .await
    }

    // ─── Sales ───────────────────────────────────────────────────

    pub async fn list_sales(&self, filter: &SaleFilter) -> Result<Vec<Sale>, AppError> {
        let mut query = vec![("order", "sale_date.desc".to_string())];
        if let Some(status) = filter.status {
            query.push(("status", format!("eq.{}", status.as_str())));
        }
        if let Some(client) = &filter.client {
            query.push(("client_name", format!("ilike.*{}*", client)));
        }
        if let Some(from) = filter.from {
            query.push(("sale_date", format!("gte.{}", from)));
        }
        if let Some(to) = filter.to {
            query.push(("sale_date", format!("lte.{}", to)));
        }
        self.select(tables::SALES, &query).await
    }

    pub async fn sales_by_client_email(&self, email: &str) -> Result<Vec<Sale>, AppError> {
        self.select(
            tables::SALES,
            &[
                ("client_email", format!("eq.{}", email)),
                ("order", "sale_date.desc".to_string()),
            ],
        )
        .await
    }

    pub async fn insert_sale(&self, input: &SaleInput) -> Result<Sale, AppError> {
        self.insert(tables::SALES, input).await
    }

    pub async fn update_sale(&self, id: Uuid, input: &SaleInput) -> Result<Option<Sale>, AppError> {
        self.update_by_id(tables::SALES, id, input).await
    }

    pub async fn delete_sale(&self, id: Uuid) -> Result<(), AppError> {
        self.delete_where(tables::SALES, &[("id", format!("eq.{}", id))])
            .await
    }

    // ─── Galleries ───────────────────────────────────────────────

    pub async fn list_galleries(&self) -> Result<Vec<Gallery>, AppError> {
        self.select(
            tables::GALLERIES,
            &[("order", "display_order.asc".to_string())],
        )
        .await
    }

    pub async fn insert_gallery(&self, input: &GalleryInput) -> Result<Gallery, AppError> {
        self.insert(tables::GALLERIES, input).await
    }

    pub async fn update_gallery(
        &self,
        id: Uuid,
        input: &GalleryInput,
    ) -> Result<Option<Gallery>, AppError> {
        self.update_by_id(tables::GALLERIES, id, input).await
    }

    pub async fn delete_gallery(&self, id: Uuid) -> Result<(), AppError> {
        self.delete_where(tables::GALLERIES, &[("id", format!("eq.{}", id))])
            .await
    }

    // ─── Gallery images ──────────────────────────────────────────

    pub async fn list_gallery_images(
        &self,
        gallery_id: Uuid,
    ) -> Result<Vec<GalleryImage>, AppError> {
        self.select(
            tables::GALLERY_IMAGES,
            &[
                ("gallery_id", format!("eq.{}", gallery_id)),
                ("order", "display_order.asc".to_string()),
            ],
        )
        .await
    }

    pub async fn get_image(&self, id: Uuid) -> Result<Option<GalleryImage>, AppError> {
        let mut rows = self
            .select::<GalleryImage>(
                tables::GALLERY_IMAGES,
                &[("id", format!("eq.{}", id)), ("limit", "1".into())],
            )
            .await?;
        Ok(rows.pop())
    }

    pub async fn insert_image(
        &self,
        gallery_id: Uuid,
        url: &str,
        alt_text: Option<&str>,
        display_order: i32,
    ) -> Result<GalleryImage, AppError> {
        self.insert(
            tables::GALLERY_IMAGES,
            &json!({
                "gallery_id": gallery_id,
                "url": url,
                "alt_text": alt_text,
                "display_order": display_order,
            }),
        )
        .await
    }

    pub async fn update_image(
        &self,
        id: Uuid,
        body: &serde_json::Value,
    ) -> Result<Option<GalleryImage>, AppError> {
        self.update_by_id(tables::GALLERY_IMAGES, id, body).await
    }

    pub async fn delete_image(&self, id: Uuid) -> Result<(), AppError> {
        self.delete_where(tables::GALLERY_IMAGES, &[("id", format!("eq.{}", id))])
            .await
    }

    /// Remove all image rows for a gallery (cascade step after the
    /// backing objects are deleted).
    pub async fn delete_images_for_gallery(&self, gallery_id: Uuid) -> Result<(), AppError> {
        self.delete_where(
            tables::GALLERY_IMAGES,
            &[("gallery_id", format!("eq.{}", gallery_id))],
        )
        .await
    }
}
