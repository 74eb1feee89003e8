//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for users, groups, expenses, settlements and balances
//! - Request validation and response types
//! - Domain error to HTTP response mapping

pub mod error;
pub mod routes;

use axum::Router;
use divvy_core::balance::{BalanceCache, BalanceService};
use divvy_db::LedgerRepository;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Cached balance views, invalidated on every ledger write.
    pub balances: Arc<BalanceService<LedgerRepository>>,
}

impl AppState {
    /// Creates the state around a database connection and a balance cache.
    #[must_use]
    pub fn new(db: DatabaseConnection, cache: BalanceCache) -> Self {
        let ledger = Arc::new(LedgerRepository::new(db.clone()));
        Self {
            db: Arc::new(db),
            balances: Arc::new(BalanceService::new(ledger, cache)),
        }
    }
}

/// Creates the main application router.
///
/// API routes are nested under `prefix`; `/health` stays at the root.
pub fn create_router(state: AppState, prefix: &str) -> Router {
    let api = routes::api_routes();
    let prefix = prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(prefix, api)
    };

    router
        .merge(routes::health::routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
