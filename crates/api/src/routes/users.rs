//! User routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use divvy_db::UserRepository;
use divvy_db::repositories::UserError;
use divvy_db::entities::users;
use divvy_shared::types::{PageRequest, PageResponse, UserId};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, error::ApiError};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}", get(get_user))
}

/// Request body for creating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Unique email address.
    #[validate(email)]
    pub email: String,
}

/// Response for a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// POST `/users` - Create a user.
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name: cannot be blank"));
    }

    let repo = UserRepository::new((*state.db).clone());
    let user = repo.create(name, &payload.email).await?;

    info!(user_id = %user.id, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))).into_response())
}

/// GET `/users` - List users, oldest first.
async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Response, ApiError> {
    let page = page.normalized();
    let repo = UserRepository::new((*state.db).clone());
    let (users, total) = repo.list(&page).await?;

    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(PageResponse::new(data, page.page, page.per_page, total)).into_response())
}

/// GET `/users/{user_id}` - Get a user.
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let user_id = UserId::from_uuid(user_id);
    let repo = UserRepository::new((*state.db).clone());
    let user = repo
        .find_by_id(user_id)
        .await?
        .ok_or(UserError::NotFound(user_id))?;

    Ok(Json(UserResponse::from(user)).into_response())
}
