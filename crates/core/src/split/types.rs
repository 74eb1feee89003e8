//! Split allocation types.

use std::fmt;
use std::str::FromStr;

use divvy_shared::types::{Money, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an expense total is divided among its participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SplitMode {
    /// Divide evenly, leftover cents to the earliest participants.
    Equal,
    /// Every participant states an explicit amount.
    Exact,
    /// Every participant states a percentage of the total.
    Percent,
}

impl SplitMode {
    /// Returns the canonical upper-case name used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "EQUAL",
            Self::Exact => "EXACT",
            Self::Percent => "PERCENT",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EQUAL" => Ok(Self::Equal),
            "EXACT" => Ok(Self::Exact),
            "PERCENT" => Ok(Self::Percent),
            other => Err(format!("Unknown split mode: {other}")),
        }
    }
}

/// One participant's entry in an allocation request.
///
/// `amount` is read in `Exact` mode and `percent` in `Percent` mode;
/// `Equal` mode only looks at `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRequest {
    /// The participant.
    pub user_id: UserId,
    /// Explicit amount, required for `Exact`.
    pub amount: Option<Decimal>,
    /// Percentage in `[0, 100]`, required for `Percent`.
    pub percent: Option<Decimal>,
}

impl SplitRequest {
    /// A request naming only the participant.
    #[must_use]
    pub const fn participant(user_id: UserId) -> Self {
        Self {
            user_id,
            amount: None,
            percent: None,
        }
    }

    /// A request carrying an explicit amount.
    #[must_use]
    pub const fn with_amount(user_id: UserId, amount: Decimal) -> Self {
        Self {
            user_id,
            amount: Some(amount),
            percent: None,
        }
    }

    /// A request carrying a percentage.
    #[must_use]
    pub const fn with_percent(user_id: UserId, percent: Decimal) -> Self {
        Self {
            user_id,
            amount: None,
            percent: Some(percent),
        }
    }
}

/// The allocated share of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    /// The participant.
    pub user_id: UserId,
    /// Amount owed for this expense, in cents.
    pub amount: Money,
    /// Requested percentage rounded to two places, `Percent` mode only.
    pub percent: Option<Decimal>,
}
