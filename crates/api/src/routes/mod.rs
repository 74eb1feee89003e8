//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod balances;
pub mod expenses;
pub mod groups;
pub mod health;
pub mod settlements;
pub mod users;

/// Creates the API router with all versioned routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(groups::routes())
        .merge(expenses::routes())
        .merge(settlements::routes())
        .merge(balances::routes())
}
