//! Group and membership routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use divvy_db::GroupRepository;
use divvy_db::repositories::{GroupError, MemberWithUser};
use divvy_shared::types::{GroupId, UserId};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::users::UserResponse;
use crate::{AppState, error::ApiError};

/// Creates the group routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups/{group_id}", get(get_group))
        .route("/groups/{group_id}/members", post(add_member))
}

/// Request body for creating a group.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    /// Group name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Request body for adding a member.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// The user to add.
    pub user_id: Uuid,
}

/// A member as shown inside a group.
#[derive(Debug, Serialize)]
pub struct GroupMemberResponse {
    /// Member's user ID.
    pub user_id: Uuid,
    /// When the member joined.
    pub joined_at: DateTime<FixedOffset>,
    /// The member's user record.
    pub user: UserResponse,
}

impl From<MemberWithUser> for GroupMemberResponse {
    fn from(member: MemberWithUser) -> Self {
        Self {
            user_id: member.membership.user_id,
            joined_at: member.membership.joined_at,
            user: UserResponse::from(member.user),
        }
    }
}

/// Response for a group with its members in join order.
#[derive(Debug, Serialize)]
pub struct GroupResponse {
    /// Group ID.
    pub id: Uuid,
    /// Group name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Members in join order.
    pub members: Vec<GroupMemberResponse>,
}

async fn load_group(repo: &GroupRepository, group_id: GroupId) -> Result<GroupResponse, ApiError> {
    let group = repo
        .find_by_id(group_id)
        .await?
        .ok_or(GroupError::NotFound(group_id))?;
    let members = repo.list_members(group_id).await?;

    Ok(GroupResponse {
        id: group.id,
        name: group.name,
        created_at: group.created_at,
        members: members.into_iter().map(GroupMemberResponse::from).collect(),
    })
}

/// POST `/groups` - Create an empty group.
async fn create_group(
    State(state): State<AppState>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name: cannot be blank"));
    }

    let repo = GroupRepository::new((*state.db).clone());
    let group = repo.create(name).await?;

    info!(group_id = %group.id, "Group created");

    let response = GroupResponse {
        id: group.id,
        name: group.name,
        created_at: group.created_at,
        members: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// GET `/groups/{group_id}` - Get a group with its members.
async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let repo = GroupRepository::new((*state.db).clone());
    let group = load_group(&repo, GroupId::from_uuid(group_id)).await?;

    Ok(Json(group).into_response())
}

/// POST `/groups/{group_id}/members` - Add a user to a group.
async fn add_member(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<Response, ApiError> {
    let group_id = GroupId::from_uuid(group_id);
    let user_id = UserId::from_uuid(payload.user_id);
    let repo = GroupRepository::new((*state.db).clone());

    repo.add_member(group_id, user_id).await?;
    // New members start at zero, which the cached net view would omit.
    state.balances.invalidate(group_id);

    info!(group_id = %group_id, user_id = %user_id, "Member added");

    let group = load_group(&repo, group_id).await?;
    Ok((StatusCode::CREATED, Json(group)).into_response())
}
