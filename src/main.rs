// SPDX-License-Identifier: MIT

//! Angra Back-Office API Server

use angra_backoffice::{
    config::Config,
    services::SessionResolver,
    supabase::{AuthClient, StorageClient, SupabaseDb, GALLERY_BUCKET},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Angra back-office API");

    // Clients for the hosted backend
    let auth = AuthClient::new(&config.supabase_url, &config.supabase_anon_key);
    let db = SupabaseDb::new(&config.supabase_url, &config.supabase_service_role_key);
    let storage = StorageClient::new(
        &config.supabase_url,
        &config.supabase_service_role_key,
        GALLERY_BUCKET,
    );
    tracing::info!(backend = %config.supabase_url, "Supabase clients initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        auth,
        db,
        storage,
        session: SessionResolver::new(),
    });

    // Build router
    let app = angra_backoffice::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("angra_backoffice=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
