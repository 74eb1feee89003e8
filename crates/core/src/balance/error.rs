//! Balance engine error types.

use divvy_shared::AppError;
use divvy_shared::types::{GroupId, Money};
use thiserror::Error;

/// Errors that can occur while deriving group balances.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// The group does not exist.
    #[error("Group {0} not found")]
    GroupNotFound(GroupId),

    /// Net positions handed to the simplifier do not sum to zero.
    #[error("Net balances sum to {0} instead of zero")]
    ImbalancedNet(Money),

    /// The ledger reader failed.
    #[error(transparent)]
    Source(#[from] AppError),
}

impl BalanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::GroupNotFound(_) => "GROUP_NOT_FOUND",
            Self::ImbalancedNet(_) => "IMBALANCED_NET",
            Self::Source(source) => source.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::GroupNotFound(_) => 404,
            Self::ImbalancedNet(_) => 500,
            Self::Source(source) => source.status_code(),
        }
    }
}
