//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes for accounts, journal entries, ledgers and reports
//! - Authentication middleware
//! - JSON error responses mapped from domain and store errors

pub mod error;
pub mod middleware;
pub mod routes;

use axum::Router;
use obrador_core::sales::SaleAccountCodes;
use obrador_db::JournalRepository;
use obrador_shared::JwtService;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Prefix of generated entry numbers.
    pub entry_number_prefix: Arc<str>,
    /// Chart codes the sale policy posts to.
    pub sale_accounts: Arc<SaleAccountCodes>,
}

impl AppState {
    /// Journal repository numbering with the configured prefix.
    #[must_use]
    pub fn journal(&self) -> JournalRepository {
        JournalRepository::new((*self.db).clone()).with_prefix(&*self.entry_number_prefix)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
