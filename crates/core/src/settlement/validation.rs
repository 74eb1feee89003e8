//! Settlement validation.

use divvy_shared::types::{GroupId, Money, UserId};
use rust_decimal::Decimal;

use super::error::SettlementError;

/// A settlement as submitted.
#[derive(Debug, Clone)]
pub struct SettlementDraft {
    /// Group the payment belongs to.
    pub group_id: GroupId,
    /// Member who paid.
    pub payer: UserId,
    /// Member who received.
    pub payee: UserId,
    /// Amount paid, rounded half-up to cents on validation.
    pub amount: Decimal,
}

/// A validated settlement, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSettlement {
    /// Group the payment belongs to.
    pub group_id: GroupId,
    /// Member who paid.
    pub payer: UserId,
    /// Member who received.
    pub payee: UserId,
    /// Amount paid, always > 0.
    pub amount: Money,
}

/// Checks a settlement against the group's members.
///
/// # Errors
///
/// Returns an error if payer and payee are the same person, either is not
/// a member, or the amount is not positive once rounded to cents.
pub fn validate_settlement(
    draft: SettlementDraft,
    members: &[UserId],
) -> Result<NewSettlement, SettlementError> {
    if draft.payer == draft.payee {
        return Err(SettlementError::SamePayerPayee);
    }
    if !members.contains(&draft.payer) {
        return Err(SettlementError::PayerNotMember(draft.payer));
    }
    if !members.contains(&draft.payee) {
        return Err(SettlementError::PayeeNotMember(draft.payee));
    }

    let amount = Money::from_decimal(draft.amount);
    if !amount.is_positive() {
        return Err(SettlementError::NonPositiveAmount(amount));
    }

    Ok(NewSettlement {
        group_id: draft.group_id,
        payer: draft.payer,
        payee: draft.payee,
        amount,
    })
}
