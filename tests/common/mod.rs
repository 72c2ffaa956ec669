// SPDX-License-Identifier: MIT

use angra_backoffice::config::Config;
use angra_backoffice::routes::create_router;
use angra_backoffice::services::SessionResolver;
use angra_backoffice::supabase::{AuthClient, StorageClient, SupabaseDb, GALLERY_BUCKET};
use angra_backoffice::AppState;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;

/// Check if a live Supabase test project is configured.
#[allow(dead_code)]
pub fn backend_available() -> bool {
    std::env::var("SUPABASE_TEST_URL").is_ok()
}

/// Skip test with message if no live backend is configured.
#[macro_export]
macro_rules! require_backend {
    () => {
        if !crate::common::backend_available() {
            eprintln!("⚠️  Skipping: SUPABASE_TEST_URL not set");
            return;
        }
    };
}

/// Create a test app with offline mock backends.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let state = Arc::new(AppState {
        config,
        auth: AuthClient::new_mock(),
        db: SupabaseDb::new_mock(),
        storage: StorageClient::new_mock(GALLERY_BUCKET),
        session: SessionResolver::new(),
    });
    (create_router(state.clone()), state)
}

/// Fixed principal id used across tests.
#[allow(dead_code)]
pub const TEST_USER_ID: &str = "a51f9a66-0000-4000-8000-000000000001";

/// Mint a provider-shaped access token. `role` lands in user metadata;
/// with the mock database returning no profile row, the metadata role is
/// what request authentication resolves.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, role: Option<&str>, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let metadata = match role {
        Some(role) => serde_json::json!({ "role": role, "full_name": "Test User" }),
        None => serde_json::json!({}),
    };
    let claims = serde_json::json!({
        "sub": user_id,
        "aud": "authenticated",
        "exp": now + 3600,
        "iat": now,
        "email": "test@example.com",
        "user_metadata": metadata,
    });
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("JWT encoding should succeed")
}
