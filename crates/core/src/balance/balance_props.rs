//! Property-based tests for the balance engine.

use std::collections::BTreeSet;

use divvy_shared::types::Money;
use proptest::prelude::*;

use super::raw::raw_balances;
use super::simplify::{net_balances, simplify, simplify_raw};
use super::types::{NetBalances, SettlementLine, SplitLine};

/// Participants are small integers; the engine only needs `Copy + Ord`.
fn participant() -> impl Strategy<Value = u8> {
    0u8..6
}

fn amount() -> impl Strategy<Value = Money> {
    (1i64..50_000).prop_map(Money::from_cents)
}

fn split_line() -> impl Strategy<Value = SplitLine<u8>> {
    (participant(), participant(), amount()).prop_map(|(payer, participant, amount)| SplitLine {
        payer,
        participant,
        amount,
    })
}

fn settlement_line() -> impl Strategy<Value = SettlementLine<u8>> {
    (participant(), participant(), amount())
        .prop_filter("payer and payee differ", |(payer, payee, _)| payer != payee)
        .prop_map(|(payer, payee, amount)| SettlementLine { payer, payee, amount })
}

/// A ledger plus a shuffled copy of it.
fn ledger_with_permutation()
-> impl Strategy<Value = (Vec<SplitLine<u8>>, Vec<SettlementLine<u8>>, Vec<SplitLine<u8>>, Vec<SettlementLine<u8>>)>
{
    (
        prop::collection::vec(split_line(), 0..30),
        prop::collection::vec(settlement_line(), 0..15),
    )
        .prop_flat_map(|(splits, settlements)| {
            let shuffled_splits = Just(splits.clone()).prop_shuffle();
            let shuffled_settlements = Just(settlements.clone()).prop_shuffle();
            (Just(splits), Just(settlements), shuffled_splits, shuffled_settlements)
        })
}

/// Net positions that sum to zero, built from random pairwise debts.
fn zero_sum_net() -> impl Strategy<Value = NetBalances<u8>> {
    prop::collection::vec((participant(), participant(), amount()), 0..20).prop_map(|edges| {
        let mut net = NetBalances::new();
        for (from, to, amount) in edges {
            *net.entry(from).or_default() -= amount;
            *net.entry(to).or_default() += amount;
        }
        net
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Permuting expenses and settlements does not change the raw ledger.
    #[test]
    fn prop_raw_balances_are_order_independent(
        (splits, settlements, shuffled_splits, shuffled_settlements) in ledger_with_permutation(),
    ) {
        prop_assert_eq!(
            raw_balances(&splits, &settlements),
            raw_balances(&shuffled_splits, &shuffled_settlements)
        );
    }

    /// Raw debts are strictly positive and never pair a participant with itself.
    #[test]
    fn prop_raw_debts_are_positive_and_distinct(
        splits in prop::collection::vec(split_line(), 0..30),
        settlements in prop::collection::vec(settlement_line(), 0..15),
    ) {
        let raw = raw_balances(&splits, &settlements);
        let mut seen = BTreeSet::new();
        for debt in &raw {
            prop_assert!(debt.amount.is_positive());
            prop_assert_ne!(debt.debtor, debt.creditor);
            prop_assert!(seen.insert((debt.debtor, debt.creditor)));
        }
    }

    /// Applying the transfers drives every net position to exactly zero.
    #[test]
    fn prop_simplification_settles_everyone(net in zero_sum_net()) {
        let transfers = simplify(&net).unwrap();

        let mut remaining = net.clone();
        for transfer in &transfers {
            prop_assert!(transfer.amount.is_positive());
            prop_assert_ne!(transfer.payer, transfer.payee);
            *remaining.entry(transfer.payer).or_default() += transfer.amount;
            *remaining.entry(transfer.payee).or_default() -= transfer.amount;
        }
        prop_assert!(remaining.values().all(|v| v.is_zero()));
    }

    /// No participant both pays and receives, and the plan stays short.
    #[test]
    fn prop_simplification_is_one_directional_and_bounded(net in zero_sum_net()) {
        let transfers = simplify(&net).unwrap();

        let payers: BTreeSet<u8> = transfers.iter().map(|t| t.payer).collect();
        let payees: BTreeSet<u8> = transfers.iter().map(|t| t.payee).collect();
        prop_assert!(payers.is_disjoint(&payees));

        let debtors = net.values().filter(|v| v.is_negative()).count();
        let creditors = net.values().filter(|v| v.is_positive()).count();
        prop_assert!(transfers.len() <= (debtors + creditors).saturating_sub(1));
    }

    /// Simplifying raw debts settles the same net positions they imply.
    #[test]
    fn prop_simplify_raw_matches_net(
        splits in prop::collection::vec(split_line(), 0..30),
        settlements in prop::collection::vec(settlement_line(), 0..15),
    ) {
        let raw = raw_balances(&splits, &settlements);
        let net = net_balances(&raw);
        prop_assert_eq!(simplify_raw(&raw), simplify(&net).unwrap());
    }
}
