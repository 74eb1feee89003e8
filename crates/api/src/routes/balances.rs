//! Balance routes.
//!
//! All three views come from the same cached computation, so they are always
//! consistent with each other.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
};
use divvy_core::balance::{NetBalances, RawDebt, Transfer};
use divvy_shared::types::{GroupId, Money, UserId};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups/{group_id}/balances/raw", get(raw_balances))
        .route("/groups/{group_id}/balances/simplified", get(simplified_balances))
        .route("/groups/{group_id}/balances/net", get(net_balances))
}

/// `debtor_id` owes `creditor_id`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RawBalanceResponse {
    /// Who owes.
    pub debtor_id: Uuid,
    /// Who is owed.
    pub creditor_id: Uuid,
    /// Amount owed.
    pub amount: Money,
}

impl From<RawDebt<UserId>> for RawBalanceResponse {
    fn from(debt: RawDebt<UserId>) -> Self {
        Self {
            debtor_id: debt.debtor.into_inner(),
            creditor_id: debt.creditor.into_inner(),
            amount: debt.amount,
        }
    }
}

/// `payer_id` should pay `payee_id`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SimplifiedBalanceResponse {
    /// Who should pay.
    pub payer_id: Uuid,
    /// Who should receive.
    pub payee_id: Uuid,
    /// Amount to pay.
    pub amount: Money,
}

impl From<Transfer<UserId>> for SimplifiedBalanceResponse {
    fn from(transfer: Transfer<UserId>) -> Self {
        Self {
            payer_id: transfer.payer.into_inner(),
            payee_id: transfer.payee.into_inner(),
            amount: transfer.amount,
        }
    }
}

/// Signed position of one member: positive is owed, negative owes.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NetBalanceResponse {
    /// The member.
    pub user_id: Uuid,
    /// Net position.
    pub amount: Money,
}

fn net_response(net: NetBalances<UserId>) -> Vec<NetBalanceResponse> {
    net.into_iter()
        .map(|(user_id, amount)| NetBalanceResponse {
            user_id: user_id.into_inner(),
            amount,
        })
        .collect()
}

/// GET `/groups/{group_id}/balances/raw` - Pairwise debts.
async fn raw_balances(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let raw = state
        .balances
        .raw_balances(GroupId::from_uuid(group_id))
        .await?;
    let response: Vec<RawBalanceResponse> = raw.into_iter().map(RawBalanceResponse::from).collect();

    Ok(Json(response).into_response())
}

/// GET `/groups/{group_id}/balances/simplified` - Suggested transfers.
async fn simplified_balances(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let transfers = state
        .balances
        .simplified_balances(GroupId::from_uuid(group_id))
        .await?;
    let response: Vec<SimplifiedBalanceResponse> = transfers
        .into_iter()
        .map(SimplifiedBalanceResponse::from)
        .collect();

    Ok(Json(response).into_response())
}

/// GET `/groups/{group_id}/balances/net` - Net position per member.
async fn net_balances(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let net = state
        .balances
        .net_balances(GroupId::from_uuid(group_id))
        .await?;

    Ok(Json(net_response(net)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    #[test]
    fn test_raw_response_shape() {
        let debt = RawDebt {
            debtor: user(2),
            creditor: user(1),
            amount: Money::from_cents(5_000),
        };
        let json = serde_json::to_value(RawBalanceResponse::from(debt)).unwrap();
        assert_eq!(json["debtor_id"], Uuid::from_u128(2).to_string());
        assert_eq!(json["creditor_id"], Uuid::from_u128(1).to_string());
        assert_eq!(json["amount"], "50.00");
    }

    #[test]
    fn test_net_response_keeps_zero_members_in_key_order() {
        let mut net = NetBalances::new();
        net.insert(user(3), Money::ZERO);
        net.insert(user(1), Money::from_cents(1_000));
        net.insert(user(2), Money::from_cents(-1_000));

        let response = net_response(net);
        let ids: Vec<Uuid> = response.iter().map(|r| r.user_id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)]);
        assert_eq!(response[2].amount, Money::ZERO);
    }
}
