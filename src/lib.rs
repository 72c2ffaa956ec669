// SPDX-License-Identifier: MIT

//! Angra back-office: administrative API for The Best of Angra.
//!
//! This crate provides the back-office service for the vacation-rental
//! site: authentication and session/role resolution against the hosted
//! identity provider, the staff screens (clients, sales ledger, gallery
//! management, user roles) and the client order-status portal. All
//! persistence is delegated to the hosted Supabase backend.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod supabase;

use config::Config;
use services::SessionResolver;
use supabase::{AuthClient, StorageClient, SupabaseDb};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth: AuthClient,
    pub db: SupabaseDb,
    pub storage: StorageClient,
    pub session: SessionResolver,
}
