// SPDX-License-Identifier: MIT

//! Clients for the hosted Supabase backend.
//!
//! Three REST surfaces are consumed:
//! - GoTrue auth API (`/auth/v1`) for identity operations
//! - PostgREST data API (`/rest/v1`) for table access
//! - Storage API (`/storage/v1`) for gallery image objects
//!
//! Each client supports an offline mock mode for tests.

pub mod auth;
pub mod postgrest;
pub mod storage;

pub use auth::{AuthClient, AuthSession, AuthUser};
pub use postgrest::{SaleFilter, SupabaseDb};
pub use storage::StorageClient;

/// Table names as constants.
pub mod tables {
    pub const PROFILES: &str = "profiles";
    pub const CLIENTS: &str = "clients";
    pub const SALES: &str = "sales";
    pub const GALLERIES: &str = "galleries";
    pub const GALLERY_IMAGES: &str = "gallery_images";
}

/// Bucket holding gallery image objects.
pub const GALLERY_BUCKET: &str = "gallery-images";
