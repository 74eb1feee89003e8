//! Property-based tests for split allocation.
//!
//! Every mode must return shares that add up to the total to the cent,
//! and equal splits must never differ by more than one cent.

use divvy_shared::types::{Money, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::allocator::Allocator;
use super::types::{SplitMode, SplitRequest};

/// Totals from 0.01 to 1,000,000.00.
fn total_strategy() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_cents)
}

fn participants(count: usize) -> Vec<UserId> {
    (0..count)
        .map(|n| UserId::from_uuid(Uuid::from_u128(n as u128 + 1)))
        .collect()
}

/// Whole-percent weights that add up to exactly 100.
fn percent_strategy() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u32..=100, 1..8).prop_map(|weights| {
        let weight_sum: u32 = weights.iter().sum();
        let mut percents: Vec<Decimal> = weights
            .iter()
            .map(|w| (Decimal::from(*w) * Decimal::ONE_HUNDRED / Decimal::from(weight_sum)).round_dp(2))
            .collect();
        let assigned: Decimal = percents.iter().sum();
        if let Some(last) = percents.last_mut() {
            *last += Decimal::ONE_HUNDRED - assigned;
        }
        percents
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Equal shares add up to the total and differ by at most one cent,
    /// with the larger shares at the front.
    #[test]
    fn prop_equal_split_is_fair_and_exact(
        total in total_strategy(),
        count in 1usize..25,
    ) {
        let shares = Allocator::split_equal(total, &participants(count)).unwrap();
        let sum: Money = shares.iter().map(|s| s.amount).sum();
        prop_assert_eq!(sum, total);

        let first = shares[0].amount;
        for pair in shares.windows(2) {
            prop_assert!(pair[0].amount >= pair[1].amount);
        }
        for share in &shares {
            prop_assert!(first - share.amount <= Money::CENT);
        }
    }

    /// Percent shares add up to the total for any percentages summing to 100.
    #[test]
    fn prop_percent_split_is_exact(
        total in total_strategy(),
        percents in percent_strategy(),
    ) {
        let users = participants(percents.len());
        let requests: Vec<SplitRequest> = users
            .iter()
            .zip(&percents)
            .map(|(id, p)| SplitRequest::with_percent(*id, *p))
            .collect();

        let shares = Allocator::allocate(total, SplitMode::Percent, &requests).unwrap();
        let sum: Money = shares.iter().map(|s| s.amount).sum();
        prop_assert_eq!(sum, total);
        prop_assert!(shares.iter().all(|s| !s.amount.is_negative()));
    }

    /// Exact shares that add up to the total come back unchanged.
    #[test]
    fn prop_exact_split_round_trips(
        cents in prop::collection::vec(0i64..1_000_000, 1..10),
    ) {
        let users = participants(cents.len());
        let total = Money::from_cents(cents.iter().sum());
        let requests: Vec<SplitRequest> = users
            .iter()
            .zip(&cents)
            .map(|(id, c)| SplitRequest::with_amount(*id, Money::from_cents(*c).amount()))
            .collect();

        let shares = Allocator::allocate(total, SplitMode::Exact, &requests).unwrap();
        for (share, c) in shares.iter().zip(&cents) {
            prop_assert_eq!(share.amount, Money::from_cents(*c));
        }
    }
}
