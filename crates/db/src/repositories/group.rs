//! Group and membership repository.

use divvy_shared::types::{GroupId, UserId};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{group_members, groups, users};

/// Error types for group operations.
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    /// Group not found.
    #[error("Group {0} not found")]
    NotFound(GroupId),

    /// User not found.
    #[error("User {0} not found")]
    UserNotFound(UserId),

    /// User already belongs to the group.
    #[error("User {user_id} is already a member of group {group_id}")]
    AlreadyMember {
        /// The group.
        group_id: GroupId,
        /// The user.
        user_id: UserId,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl GroupError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "GROUP_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::AlreadyMember { .. } => "ALREADY_MEMBER",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::UserNotFound(_) => 404,
            Self::AlreadyMember { .. } => 409,
            Self::Database(_) => 500,
        }
    }
}

/// A group member with their user record.
#[derive(Debug, Clone)]
pub struct MemberWithUser {
    /// The membership row.
    pub membership: group_members::Model,
    /// The member's user record.
    pub user: users::Model,
}

/// Repository for groups and their members.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    db: DatabaseConnection,
}

impl GroupRepository {
    /// Creates a new group repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an empty group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, name: &str) -> Result<groups::Model, DbErr> {
        let group = groups::ActiveModel {
            id: Set(GroupId::new().into_inner()),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };

        group.insert(&self.db).await
    }

    /// Finds a group by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: GroupId) -> Result<Option<groups::Model>, DbErr> {
        groups::Entity::find_by_id(id.into_inner()).one(&self.db).await
    }

    /// Checks if a group exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, id: GroupId) -> Result<bool, DbErr> {
        let count = groups::Entity::find_by_id(id.into_inner())
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Adds a user to a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the group or user does not exist, the user is
    /// already a member, or the database insert fails.
    pub async fn add_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<group_members::Model, GroupError> {
        if !self.exists(group_id).await? {
            return Err(GroupError::NotFound(group_id));
        }

        let user = users::Entity::find_by_id(user_id.into_inner())
            .one(&self.db)
            .await?;
        if user.is_none() {
            return Err(GroupError::UserNotFound(user_id));
        }

        let member = group_members::Model {
            group_id: group_id.into_inner(),
            user_id: user_id.into_inner(),
            joined_at: chrono::Utc::now().into(),
        };

        let inserted = group_members::Entity::insert(group_members::ActiveModel::from(member.clone()))
            .on_conflict(
                OnConflict::columns([group_members::Column::GroupId, group_members::Column::UserId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        if inserted == 0 {
            return Err(GroupError::AlreadyMember { group_id, user_id });
        }

        Ok(member)
    }

    /// Lists members with their user records, in join order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_members(&self, group_id: GroupId) -> Result<Vec<MemberWithUser>, DbErr> {
        group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id.into_inner()))
            .order_by_asc(group_members::Column::JoinedAt)
            .order_by_asc(group_members::Column::UserId)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .map(|results| {
                results
                    .into_iter()
                    .filter_map(|(membership, user)| user.map(|user| MemberWithUser { membership, user }))
                    .collect()
            })
    }

    /// Lists member IDs in join order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn member_ids(&self, group_id: GroupId) -> Result<Vec<UserId>, DbErr> {
        let ids: Vec<uuid::Uuid> = group_members::Entity::find()
            .select_only()
            .column(group_members::Column::UserId)
            .filter(group_members::Column::GroupId.eq(group_id.into_inner()))
            .order_by_asc(group_members::Column::JoinedAt)
            .order_by_asc(group_members::Column::UserId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    /// Checks if a user is a member of a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_member(&self, group_id: GroupId, user_id: UserId) -> Result<bool, DbErr> {
        let count = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id.into_inner()))
            .filter(group_members::Column::UserId.eq(user_id.into_inner()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
