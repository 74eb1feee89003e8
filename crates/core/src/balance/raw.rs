//! Raw pairwise debt derivation.
//!
//! Accumulates into a map keyed by the directed pair `(debtor, creditor)`.
//! Entries may go negative while settlements are applied; only strictly
//! positive entries survive, and the filter runs once after everything has
//! been summed. The output therefore does not depend on input order.

use std::collections::BTreeMap;

use divvy_shared::types::Money;

use super::types::{RawDebt, SettlementLine, SplitLine};

/// Derives who owes whom from expense splits and settlements.
///
/// - A split whose participant is the payer adds nothing.
/// - Any other split adds its amount to `(participant, payer)`.
/// - A settlement subtracts its amount from `(payer, payee)` only; it never
///   touches the reverse pair `(payee, payer)`.
///
/// Overpayments are dropped rather than carried as reverse debt. The result
/// is ordered by `(debtor, creditor)`.
#[must_use]
pub fn raw_balances<P: Copy + Ord>(
    splits: &[SplitLine<P>],
    settlements: &[SettlementLine<P>],
) -> Vec<RawDebt<P>> {
    let mut pairs: BTreeMap<(P, P), Money> = BTreeMap::new();

    for split in splits {
        if split.participant == split.payer {
            continue;
        }
        *pairs.entry((split.participant, split.payer)).or_default() += split.amount;
    }

    for settlement in settlements {
        *pairs.entry((settlement.payer, settlement.payee)).or_default() -= settlement.amount;
    }

    pairs
        .into_iter()
        .filter(|(_, amount)| amount.is_positive())
        .map(|((debtor, creditor), amount)| RawDebt {
            debtor,
            creditor,
            amount,
        })
        .collect()
}
