//! Settlement error types.

use divvy_shared::types::{Money, UserId};
use thiserror::Error;

/// Errors that can occur while recording a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// A member cannot pay themselves.
    #[error("Payer and payee must be different")]
    SamePayerPayee,

    /// Amount is zero or negative after rounding to cents.
    #[error("Settlement amount must be greater than 0, got {0}")]
    NonPositiveAmount(Money),

    /// The payer is not in the group.
    #[error("Payer {0} must be a member of the group")]
    PayerNotMember(UserId),

    /// The payee is not in the group.
    #[error("Payee {0} must be a member of the group")]
    PayeeNotMember(UserId),
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SamePayerPayee => "SAME_PAYER_PAYEE",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::PayerNotMember(_) => "PAYER_NOT_MEMBER",
            Self::PayeeNotMember(_) => "PAYEE_NOT_MEMBER",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        400
    }
}
