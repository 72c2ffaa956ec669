// SPDX-License-Identifier: MIT

//! Storage API client for the gallery image bucket.

use crate::error::AppError;
use futures_util::{stream, StreamExt};

/// Objects deleted concurrently during a gallery cascade.
const MAX_CONCURRENT_REMOVALS: usize = 8;

/// Object storage client bound to a single bucket.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    /// None means offline mock mode (tests).
    base_url: Option<String>,
    service_key: String,
    bucket: String,
}

impl StorageClient {
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Some(base_url.trim_end_matches('/').to_string()),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    /// Offline client for tests.
    pub fn new_mock(bucket: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
            service_key: "test-service-key".to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn object_url(&self, path: &str) -> Result<String, AppError> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            AppError::Storage("object storage not configured (offline mode)".to_string())
        })?;
        Ok(format!(
            "{}/storage/v1/object/{}/{}",
            base, self.bucket, path
        ))
    }

    /// Public URL for an object in this bucket.
    pub fn public_url(&self, path: &str) -> String {
        let base = self.base_url.as_deref().unwrap_or("http://localhost");
        format!("{}/storage/v1/object/public/{}/{}", base, self.bucket, path)
    }

    /// Recover the object path from a public URL, if the URL points into
    /// this bucket.
    pub fn object_path_from_url(&self, url: &str) -> Option<String> {
        let marker = format!("/storage/v1/object/public/{}/", self.bucket);
        url.split_once(&marker)
            .map(|(_, path)| path.to_string())
            .filter(|path| !path.is_empty())
    }

    /// Upload an object, returning its public URL.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let url = self.object_url(path)?;
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type.to_string())
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!("{}: {}", status, body)));
        }
        Ok(self.public_url(path))
    }

    /// Delete a single object.
    pub async fn remove(&self, path: &str) -> Result<(), AppError> {
        let url = self.object_url(path)?;
        let response = self
            .http
            .delete(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Storage(format!("delete failed: {}", status)));
        }
        Ok(())
    }

    /// Best-effort bulk removal with bounded concurrency. Failures are
    /// logged per object; orphaned objects are preferable to aborting a
    /// gallery deletion halfway through.
    pub async fn remove_all(&self, paths: Vec<String>) {
        stream::iter(paths)
            .map(|path| async move {
                if let Err(e) = self.remove(&path).await {
                    tracing::warn!(path = %path, error = %e, "Failed to delete storage object");
                }
            })
            .buffer_unordered(MAX_CONCURRENT_REMOVALS)
            .collect::<Vec<_>>()
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_round_trips_to_path() {
        let storage = StorageClient::new(
            "https://example.supabase.co",
            "key",
            "gallery-images",
        );
        let url = storage.public_url("abc123/photo.jpg");
        assert_eq!(
            url,
            "https://example.supabase.co/storage/v1/object/public/gallery-images/abc123/photo.jpg"
        );
        assert_eq!(
            storage.object_path_from_url(&url).as_deref(),
            Some("abc123/photo.jpg")
        );
    }

    #[test]
    fn foreign_urls_yield_no_path() {
        let storage = StorageClient::new_mock("gallery-images");
        assert!(storage
            .object_path_from_url("https://elsewhere.example/photo.jpg")
            .is_none());
        assert!(storage
            .object_path_from_url(
                "https://example.supabase.co/storage/v1/object/public/other-bucket/a.jpg"
            )
            .is_none());
    }
}
