//! Expense domain types.

use divvy_shared::types::{GroupId, Money, UserId};

use crate::split::{SplitMode, SplitRequest, SplitShare};

/// Longest accepted expense description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// An expense as submitted, before allocation.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    /// Group the expense belongs to.
    pub group_id: GroupId,
    /// Member who paid.
    pub paid_by: UserId,
    /// Total paid.
    pub amount: Money,
    /// Free-text description.
    pub description: String,
    /// How to divide the total.
    pub mode: SplitMode,
    /// Participants and their amounts or percentages. May be empty for
    /// `Equal`, meaning every member of the group.
    pub splits: Vec<SplitRequest>,
}

/// A validated expense with its allocated shares, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedExpense {
    /// Group the expense belongs to.
    pub group_id: GroupId,
    /// Member who paid.
    pub paid_by: UserId,
    /// Total paid.
    pub amount: Money,
    /// Trimmed description.
    pub description: String,
    /// How the total was divided.
    pub mode: SplitMode,
    /// One share per participant; amounts sum to `amount`.
    pub shares: Vec<SplitShare>,
}
