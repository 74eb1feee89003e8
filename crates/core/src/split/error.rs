//! Split allocation error types.

use divvy_shared::types::{Money, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while allocating an amount across participants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    /// No participants to split between.
    #[error("Cannot split an amount between zero participants")]
    NoParticipants,

    /// An `Exact` request without an amount.
    #[error("EXACT split requires an amount for user {0}")]
    MissingAmount(UserId),

    /// A `Percent` request without a percentage.
    #[error("PERCENT split requires a percent for user {0}")]
    MissingPercent(UserId),

    /// An explicit amount finer than one cent.
    #[error("Amount {amount} for user {user_id} has more than 2 decimal places")]
    AmountPrecision {
        /// The participant.
        user_id: UserId,
        /// The offending amount.
        amount: Decimal,
    },

    /// An explicit amount below zero.
    #[error("Amount {amount} for user {user_id} cannot be negative")]
    NegativeAmount {
        /// The participant.
        user_id: UserId,
        /// The offending amount.
        amount: Decimal,
    },

    /// Explicit amounts do not add up to the total.
    #[error(
        "Sum of split amounts ({actual}) must equal total amount ({expected}), difference {difference}"
    )]
    SumMismatch {
        /// The expense total.
        expected: Money,
        /// Sum of the requested amounts.
        actual: Decimal,
        /// `actual - expected`.
        difference: Decimal,
    },

    /// Percentages do not add up to 100.
    #[error("Sum of percentages ({actual}) must equal 100")]
    PercentSumMismatch {
        /// Sum of the requested percentages.
        actual: Decimal,
    },

    /// A percentage outside `[0, 100]`.
    #[error("Percent {percent} for user {user_id} must be between 0 and 100")]
    PercentOutOfRange {
        /// The participant.
        user_id: UserId,
        /// The offending percentage.
        percent: Decimal,
    },

    /// Allocated shares do not add up to the total exactly.
    #[error("Split amounts sum to {actual} but the total is {expected}")]
    Unbalanced {
        /// The expense total.
        expected: Money,
        /// Sum of the allocated shares.
        actual: Money,
    },
}

impl SplitError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoParticipants => "NO_PARTICIPANTS",
            Self::MissingAmount(_) => "MISSING_AMOUNT",
            Self::MissingPercent(_) => "MISSING_PERCENT",
            Self::AmountPrecision { .. } => "AMOUNT_PRECISION",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::SumMismatch { .. } => "SPLIT_SUM_MISMATCH",
            Self::PercentSumMismatch { .. } => "PERCENT_SUM_MISMATCH",
            Self::PercentOutOfRange { .. } => "PERCENT_OUT_OF_RANGE",
            Self::Unbalanced { .. } => "SPLIT_UNBALANCED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 422 - the request parsed but the shares cannot balance to the cent
            Self::Unbalanced { .. } => 422,
            // 400 Bad Request - everything else is caller-fixable input
            _ => 400,
        }
    }
}
