//! Expense error types.

use divvy_shared::types::{ExpenseId, Money, UserId};
use thiserror::Error;

use super::types::MAX_DESCRIPTION_LEN;
use crate::split::SplitError;

/// Errors that can occur while preparing or reading an expense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpenseError {
    /// Allocation failed.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Expense total must be greater than zero.
    #[error("Expense amount must be greater than 0, got {0}")]
    NonPositiveTotal(Money),

    /// Description is blank.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// Description is too long.
    #[error("Description exceeds {MAX_DESCRIPTION_LEN} characters ({0})")]
    DescriptionTooLong(usize),

    /// The group has nobody to split with.
    #[error("Group has no members")]
    EmptyGroup,

    /// The payer is not in the group.
    #[error("Payer {0} must be a member of the group")]
    PayerNotMember(UserId),

    /// A split names someone outside the group.
    #[error("User {0} is not a member of this group")]
    ParticipantNotMember(UserId),

    /// A participant is listed more than once.
    #[error("User {0} appears more than once in the splits")]
    DuplicateParticipant(UserId),

    /// Stored split amounts no longer add up to the expense total.
    #[error("Splits of expense {expense_id} sum to {actual} but the expense total is {expected}")]
    SplitSumInvariant {
        /// The corrupted expense.
        expense_id: ExpenseId,
        /// The stored total.
        expected: Money,
        /// Sum of the stored splits.
        actual: Money,
    },
}

impl ExpenseError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Split(inner) => inner.error_code(),
            Self::NonPositiveTotal(_) => "NON_POSITIVE_AMOUNT",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::DescriptionTooLong(_) => "DESCRIPTION_TOO_LONG",
            Self::EmptyGroup => "EMPTY_GROUP",
            Self::PayerNotMember(_) => "PAYER_NOT_MEMBER",
            Self::ParticipantNotMember(_) => "PARTICIPANT_NOT_MEMBER",
            Self::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
            Self::SplitSumInvariant { .. } => "SPLIT_SUM_INVARIANT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Split(inner) => inner.http_status_code(),
            // 500 - persisted data is inconsistent
            Self::SplitSumInvariant { .. } => 500,
            _ => 400,
        }
    }
}
