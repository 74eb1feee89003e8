//! Expense repository.
//!
//! An expense and its splits are always written together in one transaction,
//! so a reader never sees an expense whose splits are missing.

use divvy_core::expense::PreparedExpense;
use divvy_shared::types::{ExpenseId, GroupId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{expense_splits, expenses};

/// An expense with its stored splits.
#[derive(Debug, Clone)]
pub struct ExpenseWithSplits {
    /// The expense row.
    pub expense: expenses::Model,
    /// One row per participant.
    pub splits: Vec<expense_splits::Model>,
}

/// Repository for expenses and their splits.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a prepared expense and its shares atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is stored in that case.
    pub async fn create(&self, prepared: &PreparedExpense) -> Result<ExpenseWithSplits, DbErr> {
        let txn = self.db.begin().await?;
        let expense_id = ExpenseId::new();

        let expense = expenses::ActiveModel {
            id: Set(expense_id.into_inner()),
            group_id: Set(prepared.group_id.into_inner()),
            paid_by_user_id: Set(prepared.paid_by.into_inner()),
            amount: Set(prepared.amount.amount()),
            description: Set(prepared.description.clone()),
            split_type: Set(prepared.mode.into()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let mut splits = Vec::with_capacity(prepared.shares.len());
        for share in &prepared.shares {
            let split = expense_splits::ActiveModel {
                expense_id: Set(expense_id.into_inner()),
                user_id: Set(share.user_id.into_inner()),
                amount: Set(share.amount.amount()),
                percent: Set(share.percent),
            }
            .insert(&txn)
            .await?;
            splits.push(split);
        }

        txn.commit().await?;

        info!(
            expense_id = %expense_id,
            group_id = %prepared.group_id,
            amount = %prepared.amount,
            participants = splits.len(),
            "Expense created"
        );

        Ok(ExpenseWithSplits { expense, splits })
    }

    /// Finds an expense with its splits.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: ExpenseId) -> Result<Option<ExpenseWithSplits>, DbErr> {
        let Some(expense) = expenses::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let splits = expense_splits::Entity::find()
            .filter(expense_splits::Column::ExpenseId.eq(id.into_inner()))
            .all(&self.db)
            .await?;

        Ok(Some(ExpenseWithSplits { expense, splits }))
    }

    /// Lists a group's expenses newest first, each with its splits.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_group(&self, group_id: GroupId) -> Result<Vec<ExpenseWithSplits>, DbErr> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.into_inner()))
            .order_by_desc(expenses::Column::CreatedAt)
            .order_by_desc(expenses::Column::Id)
            .find_with_related(expense_splits::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(expense, splits)| ExpenseWithSplits { expense, splits })
            .collect())
    }
}
