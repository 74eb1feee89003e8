//! Expense preparation and integrity checks.

use std::collections::HashSet;

use divvy_shared::types::{ExpenseId, Money, UserId};
use tracing::error;

use super::error::ExpenseError;
use super::types::{ExpenseDraft, MAX_DESCRIPTION_LEN, PreparedExpense};
use crate::split::{Allocator, SplitMode, SplitRequest};

/// Stateless expense rules.
pub struct ExpenseService;

impl ExpenseService {
    /// Validates a draft against the group's members and allocates it.
    ///
    /// `members` must be in join order: an `Equal` draft without splits is
    /// divided among all members in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The description is blank or too long
    /// - The total is not positive
    /// - The group has no members
    /// - The payer or any participant is not a member
    /// - A participant is listed twice
    /// - Allocation fails
    pub fn prepare(draft: ExpenseDraft, members: &[UserId]) -> Result<PreparedExpense, ExpenseError> {
        let description = draft.description.trim().to_string();
        if description.is_empty() {
            return Err(ExpenseError::EmptyDescription);
        }
        let length = description.chars().count();
        if length > MAX_DESCRIPTION_LEN {
            return Err(ExpenseError::DescriptionTooLong(length));
        }

        if !draft.amount.is_positive() {
            return Err(ExpenseError::NonPositiveTotal(draft.amount));
        }

        if members.is_empty() {
            return Err(ExpenseError::EmptyGroup);
        }
        if !members.contains(&draft.paid_by) {
            return Err(ExpenseError::PayerNotMember(draft.paid_by));
        }

        let requests = if draft.mode == SplitMode::Equal && draft.splits.is_empty() {
            members.iter().copied().map(SplitRequest::participant).collect()
        } else {
            draft.splits
        };

        let mut seen = HashSet::with_capacity(requests.len());
        for request in &requests {
            if !members.contains(&request.user_id) {
                return Err(ExpenseError::ParticipantNotMember(request.user_id));
            }
            if !seen.insert(request.user_id) {
                return Err(ExpenseError::DuplicateParticipant(request.user_id));
            }
        }

        let shares = Allocator::allocate(draft.amount, draft.mode, &requests)?;

        Ok(PreparedExpense {
            group_id: draft.group_id,
            paid_by: draft.paid_by,
            amount: draft.amount,
            description,
            mode: draft.mode,
            shares,
        })
    }

    /// Re-checks that stored split amounts add up to the stored total.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::SplitSumInvariant` on mismatch.
    pub fn verify_persisted<I>(expense_id: ExpenseId, total: Money, split_amounts: I) -> Result<(), ExpenseError>
    where
        I: IntoIterator<Item = Money>,
    {
        let actual: Money = split_amounts.into_iter().sum();
        if actual != total {
            error!(%expense_id, %total, %actual, "persisted splits do not sum to expense total");
            return Err(ExpenseError::SplitSumInvariant {
                expense_id,
                expected: total,
                actual,
            });
        }
        Ok(())
    }
}
