//! Ledger reader backing the balance engine.
//!
//! Loads a group's splits and settlements as plain lines. Every expense is
//! re-checked against its splits on the way out.

use divvy_core::balance::{LedgerReader, SettlementLine, SplitLine};
use divvy_core::expense::ExpenseService;
use divvy_shared::types::{ExpenseId, GroupId, Money, UserId};
use divvy_shared::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use tracing::error;

use super::group::GroupRepository;
use crate::entities::{expense_splits, expenses, settlements};

/// Database-backed [`LedgerReader`].
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn groups(&self) -> GroupRepository {
        GroupRepository::new(self.db.clone())
    }
}

fn db_error(e: DbErr) -> AppError {
    error!(error = %e, "Ledger query failed");
    AppError::Database(e.to_string())
}

impl LedgerReader for LedgerRepository {
    async fn group_exists(&self, group_id: GroupId) -> AppResult<bool> {
        self.groups().exists(group_id).await.map_err(db_error)
    }

    async fn list_expense_splits(&self, group_id: GroupId) -> AppResult<Vec<SplitLine<UserId>>> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.into_inner()))
            .order_by_asc(expenses::Column::Id)
            .find_with_related(expense_splits::Entity)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        let mut lines = Vec::new();
        for (expense, splits) in rows {
            let expense_id = ExpenseId::from_uuid(expense.id);
            let total = Money::from_decimal(expense.amount);
            ExpenseService::verify_persisted(
                expense_id,
                total,
                splits.iter().map(|s| Money::from_decimal(s.amount)),
            )
            .map_err(|e| AppError::Internal(e.to_string()))?;

            let payer = UserId::from_uuid(expense.paid_by_user_id);
            lines.extend(splits.into_iter().map(|split| SplitLine {
                payer,
                participant: UserId::from_uuid(split.user_id),
                amount: Money::from_decimal(split.amount),
            }));
        }

        Ok(lines)
    }

    async fn list_settlements(&self, group_id: GroupId) -> AppResult<Vec<SettlementLine<UserId>>> {
        let rows = settlements::Entity::find()
            .filter(settlements::Column::GroupId.eq(group_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|s| SettlementLine {
                payer: UserId::from_uuid(s.payer_id),
                payee: UserId::from_uuid(s.payee_id),
                amount: Money::from_decimal(s.amount),
            })
            .collect())
    }

    async fn list_group_member_ids(&self, group_id: GroupId) -> AppResult<Vec<UserId>> {
        self.groups().member_ids(group_id).await.map_err(db_error)
    }
}
