//! Settlement repository.

use divvy_core::settlement::NewSettlement;
use divvy_shared::types::{GroupId, SettlementId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entities::settlements;

/// Repository for recorded payments between members.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a validated settlement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, settlement: &NewSettlement) -> Result<settlements::Model, DbErr> {
        let id = SettlementId::new();
        let model = settlements::ActiveModel {
            id: Set(id.into_inner()),
            group_id: Set(settlement.group_id.into_inner()),
            payer_id: Set(settlement.payer.into_inner()),
            payee_id: Set(settlement.payee.into_inner()),
            amount: Set(settlement.amount.amount()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(
            settlement_id = %id,
            group_id = %settlement.group_id,
            amount = %settlement.amount,
            "Settlement recorded"
        );

        Ok(model)
    }

    /// Finds a settlement by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: SettlementId) -> Result<Option<settlements::Model>, DbErr> {
        settlements::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Lists a group's settlements newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_group(&self, group_id: GroupId) -> Result<Vec<settlements::Model>, DbErr> {
        settlements::Entity::find()
            .filter(settlements::Column::GroupId.eq(group_id.into_inner()))
            .order_by_desc(settlements::Column::CreatedAt)
            .order_by_desc(settlements::Column::Id)
            .all(&self.db)
            .await
    }
}
