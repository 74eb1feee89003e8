//! Greedy debt simplification.
//!
//! Collapses pairwise debts into one signed position per participant, then
//! matches the largest debtor against the largest creditor until every
//! position is zero. Not globally minimal, but linear after sorting and
//! never emits more than `debtors + creditors - 1` transfers.

use divvy_shared::types::Money;

use super::error::BalanceError;
use super::types::{NetBalances, RawDebt, Transfer};

/// Folds raw debts into a signed net position per participant.
///
/// Every participant that appears in `raw` gets an entry, even when their
/// debts and credits cancel out.
#[must_use]
pub fn net_balances<P: Copy + Ord>(raw: &[RawDebt<P>]) -> NetBalances<P> {
    let mut net = NetBalances::new();
    for debt in raw {
        *net.entry(debt.debtor).or_default() -= debt.amount;
        *net.entry(debt.creditor).or_default() += debt.amount;
    }
    net
}

/// Produces a transfer plan that drives every net position to zero.
///
/// Debtors and creditors are each sorted by magnitude, largest first; equal
/// magnitudes are ordered by ascending participant key.
///
/// # Errors
///
/// Returns `BalanceError::ImbalancedNet` if the positions do not sum to zero.
pub fn simplify<P: Copy + Ord>(net: &NetBalances<P>) -> Result<Vec<Transfer<P>>, BalanceError> {
    let total: Money = net.values().sum();
    if !total.is_zero() {
        return Err(BalanceError::ImbalancedNet(total));
    }
    Ok(settle_greedy(net))
}

/// Simplifies raw debts directly. Net positions derived from raw debts
/// always sum to zero, so this cannot fail.
#[must_use]
pub fn simplify_raw<P: Copy + Ord>(raw: &[RawDebt<P>]) -> Vec<Transfer<P>> {
    settle_greedy(&net_balances(raw))
}

fn settle_greedy<P: Copy + Ord>(net: &NetBalances<P>) -> Vec<Transfer<P>> {
    let mut debtors: Vec<(P, Money)> = Vec::new();
    let mut creditors: Vec<(P, Money)> = Vec::new();
    for (&participant, &amount) in net {
        if amount.is_negative() {
            debtors.push((participant, amount.abs()));
        } else if amount.is_positive() {
            creditors.push((participant, amount));
        }
    }

    let by_magnitude = |a: &(P, Money), b: &(P, Money)| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0));
    debtors.sort_by(by_magnitude);
    creditors.sort_by(by_magnitude);

    let mut transfers = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
    let (mut i, mut j) = (0, 0);
    let mut owed = debtors.first().map_or(Money::ZERO, |d| d.1);
    let mut due = creditors.first().map_or(Money::ZERO, |c| c.1);

    while i < debtors.len() && j < creditors.len() {
        let amount = owed.min(due);
        if amount.is_positive() {
            transfers.push(Transfer {
                payer: debtors[i].0,
                payee: creditors[j].0,
                amount,
            });
        }
        owed -= amount;
        due -= amount;

        if owed.is_zero() {
            i += 1;
            if let Some(next) = debtors.get(i) {
                owed = next.1;
            }
        }
        if due.is_zero() {
            j += 1;
            if let Some(next) = creditors.get(j) {
                due = next.1;
            }
        }
    }

    transfers
}
