//! Settlement routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use divvy_core::settlement::{SettlementDraft, validate_settlement};
use divvy_db::entities::settlements;
use divvy_db::repositories::GroupError;
use divvy_db::{GroupRepository, SettlementRepository};
use divvy_shared::types::{GroupId, Money, UserId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::expenses::MAX_AMOUNT;
use crate::{AppState, error::ApiError};

/// Creates the settlement routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/groups/{group_id}/settlements",
        get(list_settlements).post(create_settlement),
    )
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSettlementRequest {
    /// Member who paid.
    pub payer_id: Uuid,
    /// Member who received.
    pub payee_id: Uuid,
    /// Amount paid; rounded half-up to cents.
    #[validate(custom(function = validate_settlement_amount))]
    pub amount: Decimal,
}

/// Positivity is checked after rounding by the domain validation.
fn validate_settlement_amount(amount: &Decimal) -> Result<(), ValidationError> {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded >= MAX_AMOUNT {
        return Err(ValidationError::new("max_digits"));
    }
    Ok(())
}

/// Response for a settlement.
#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    /// Settlement ID.
    pub id: Uuid,
    /// Owning group.
    pub group_id: Uuid,
    /// Member who paid.
    pub payer_id: Uuid,
    /// Member who received.
    pub payee_id: Uuid,
    /// Amount paid.
    pub amount: Money,
    /// Creation timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<settlements::Model> for SettlementResponse {
    fn from(model: settlements::Model) -> Self {
        Self {
            id: model.id,
            group_id: model.group_id,
            payer_id: model.payer_id,
            payee_id: model.payee_id,
            amount: Money::from_decimal(model.amount),
            created_at: model.created_at,
        }
    }
}

/// POST `/groups/{group_id}/settlements` - Record a payment between members.
async fn create_settlement(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Json(payload): Json<CreateSettlementRequest>,
) -> Result<Response, ApiError> {
    payload.validate()?;

    let group_id = GroupId::from_uuid(group_id);
    let groups = GroupRepository::new((*state.db).clone());
    if !groups.exists(group_id).await? {
        return Err(GroupError::NotFound(group_id).into());
    }
    let members = groups.member_ids(group_id).await?;

    let settlement = validate_settlement(
        SettlementDraft {
            group_id,
            payer: UserId::from_uuid(payload.payer_id),
            payee: UserId::from_uuid(payload.payee_id),
            amount: payload.amount,
        },
        &members,
    )?;

    let created = SettlementRepository::new((*state.db).clone())
        .create(&settlement)
        .await?;
    state.balances.invalidate(group_id);

    info!(
        group_id = %group_id,
        settlement_id = %created.id,
        amount = %created.amount,
        "Settlement recorded"
    );

    Ok((StatusCode::CREATED, Json(SettlementResponse::from(created))).into_response())
}

/// GET `/groups/{group_id}/settlements` - List settlements, newest first.
async fn list_settlements(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let group_id = GroupId::from_uuid(group_id);
    if !GroupRepository::new((*state.db).clone()).exists(group_id).await? {
        return Err(GroupError::NotFound(group_id).into());
    }

    let rows = SettlementRepository::new((*state.db).clone())
        .list_by_group(group_id)
        .await?;
    let response: Vec<SettlementResponse> = rows.into_iter().map(SettlementResponse::from).collect();
    Ok(Json(response).into_response())
}
