//! Expense routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use divvy_core::expense::{ExpenseDraft, ExpenseService};
use divvy_core::split::{SplitMode, SplitRequest};
use divvy_db::repositories::{ExpenseWithSplits, GroupError};
use divvy_db::{ExpenseRepository, GroupRepository};
use divvy_shared::types::{ExpenseId, GroupId, Money, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{AppState, error::ApiError};

/// Upper bound (exclusive) on stored amounts (10 integer digits, 2 decimals).
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/groups/{group_id}/expenses",
            get(list_expenses).post(create_expense),
        )
        .route("/groups/{group_id}/expenses/{expense_id}", get(get_expense))
}

/// One participant in an expense request.
#[derive(Debug, Deserialize)]
pub struct ExpenseSplitRequest {
    /// The participant.
    pub user_id: Uuid,
    /// Explicit amount, for `EXACT` expenses.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Percentage, for `PERCENT` expenses.
    #[serde(default)]
    pub percent: Option<Decimal>,
}

/// Request body for creating an expense.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    /// Member who paid.
    pub paid_by_user_id: Uuid,
    /// Total paid.
    #[validate(custom(function = validate_total))]
    pub amount: Decimal,
    /// Free-text description.
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    /// `EQUAL`, `EXACT` or `PERCENT`.
    pub split_type: String,
    /// Participants. May be empty for `EQUAL`, meaning every member.
    #[serde(default)]
    pub splits: Vec<ExpenseSplitRequest>,
}

fn validate_total(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() || amount.is_zero() {
        return Err(ValidationError::new("positive"));
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::new("max_decimal_places"));
    }
    if *amount >= MAX_AMOUNT {
        return Err(ValidationError::new("max_digits"));
    }
    Ok(())
}

/// One stored share.
#[derive(Debug, Serialize)]
pub struct ExpenseSplitResponse {
    /// The participant.
    pub user_id: Uuid,
    /// Share amount.
    pub amount: Money,
    /// Requested percentage, `PERCENT` expenses only.
    pub percent: Option<Decimal>,
}

/// Response for an expense with its splits.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: Uuid,
    /// Owning group.
    pub group_id: Uuid,
    /// Member who paid.
    pub paid_by_user_id: Uuid,
    /// Total paid.
    pub amount: Money,
    /// Description.
    pub description: String,
    /// How the total was divided.
    pub split_type: SplitMode,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
    /// Shares ordered by participant ID.
    pub splits: Vec<ExpenseSplitResponse>,
}

impl From<ExpenseWithSplits> for ExpenseResponse {
    fn from(row: ExpenseWithSplits) -> Self {
        let mut splits: Vec<ExpenseSplitResponse> = row
            .splits
            .into_iter()
            .map(|s| ExpenseSplitResponse {
                user_id: s.user_id,
                amount: Money::from_decimal(s.amount),
                percent: s.percent,
            })
            .collect();
        splits.sort_by_key(|s| s.user_id);

        Self {
            id: row.expense.id,
            group_id: row.expense.group_id,
            paid_by_user_id: row.expense.paid_by_user_id,
            amount: Money::from_decimal(row.expense.amount),
            description: row.expense.description,
            split_type: row.expense.split_type.into(),
            created_at: row.expense.created_at,
            splits,
        }
    }
}

async fn ensure_group(state: &AppState, group_id: GroupId) -> Result<GroupRepository, ApiError> {
    let groups = GroupRepository::new((*state.db).clone());
    if !groups.exists(group_id).await? {
        return Err(GroupError::NotFound(group_id).into());
    }
    Ok(groups)
}

/// POST `/groups/{group_id}/expenses` - Record an expense and its splits.
async fn create_expense(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<Response, ApiError> {
    payload.validate()?;
    let mode: SplitMode = payload.split_type.parse().map_err(ApiError::validation)?;
    let amount = Money::try_from_exact(payload.amount)?;

    let group_id = GroupId::from_uuid(group_id);
    let groups = ensure_group(&state, group_id).await?;
    let members = groups.member_ids(group_id).await?;

    let draft = ExpenseDraft {
        group_id,
        paid_by: UserId::from_uuid(payload.paid_by_user_id),
        amount,
        description: payload.description,
        mode,
        splits: payload
            .splits
            .into_iter()
            .map(|s| SplitRequest {
                user_id: UserId::from_uuid(s.user_id),
                amount: s.amount,
                percent: s.percent,
            })
            .collect(),
    };
    let prepared = ExpenseService::prepare(draft, &members)?;

    let created = ExpenseRepository::new((*state.db).clone())
        .create(&prepared)
        .await?;
    state.balances.invalidate(group_id);

    info!(
        group_id = %group_id,
        expense_id = %created.expense.id,
        split_type = %mode,
        "Expense recorded"
    );

    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(created))).into_response())
}

/// GET `/groups/{group_id}/expenses` - List expenses, newest first.
async fn list_expenses(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let group_id = GroupId::from_uuid(group_id);
    ensure_group(&state, group_id).await?;

    let expenses = ExpenseRepository::new((*state.db).clone())
        .list_by_group(group_id)
        .await?;
    let response: Vec<ExpenseResponse> = expenses.into_iter().map(ExpenseResponse::from).collect();

    Ok(Json(response).into_response())
}

/// GET `/groups/{group_id}/expenses/{expense_id}` - Get one expense.
async fn get_expense(
    State(state): State<AppState>,
    Path((group_id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
    let expense_id = ExpenseId::from_uuid(expense_id);
    let found = ExpenseRepository::new((*state.db).clone())
        .find_by_id(expense_id)
        .await?
        .filter(|row| row.expense.group_id == group_id)
        .ok_or_else(|| {
            ApiError::not_found("EXPENSE_NOT_FOUND", format!("Expense {expense_id} not found"))
        })?;

    ExpenseService::verify_persisted(
        expense_id,
        Money::from_decimal(found.expense.amount),
        found.splits.iter().map(|s| Money::from_decimal(s.amount)),
    )?;

    Ok(Json(ExpenseResponse::from(found)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::cents(dec!(12.34), true)]
    #[case::whole(dec!(100), true)]
    #[case::trailing_zeros(dec!(5.000), true)]
    #[case::largest(dec!(9999999999.99), true)]
    #[case::zero(dec!(0), false)]
    #[case::negative(dec!(-1.00), false)]
    #[case::sub_cent(dec!(1.005), false)]
    #[case::too_many_digits(dec!(10000000000.00), false)]
    fn test_validate_total(#[case] amount: Decimal, #[case] valid: bool) {
        assert_eq!(validate_total(&amount).is_ok(), valid);
    }

    #[test]
    fn test_max_amount_constant() {
        assert_eq!(MAX_AMOUNT, dec!(10000000000.00));
    }
}
