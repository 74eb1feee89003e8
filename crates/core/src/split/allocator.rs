//! Exact-cent allocation of an expense total across participants.
//!
//! Every mode produces shares whose sum equals the total to the cent.
//! Rounding leftovers are handed out one cent at a time in input order,
//! so the earliest participants absorb any remainder.

use divvy_shared::types::{Money, UserId, round_half_up};
use rust_decimal::Decimal;

use super::error::SplitError;
use super::types::{SplitMode, SplitRequest, SplitShare};

/// Largest accepted gap between the requested and expected sums.
const SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Allocation entry points for the three split modes.
pub struct Allocator;

impl Allocator {
    /// Allocates `total` according to `mode`.
    ///
    /// In `Equal` mode the requests only name the participants; amounts and
    /// percentages on them are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure of the selected mode.
    pub fn allocate(
        total: Money,
        mode: SplitMode,
        requests: &[SplitRequest],
    ) -> Result<Vec<SplitShare>, SplitError> {
        match mode {
            SplitMode::Equal => {
                let participants: Vec<UserId> = requests.iter().map(|r| r.user_id).collect();
                Self::split_equal(total, &participants)
            }
            SplitMode::Exact => Self::split_exact(total, requests),
            SplitMode::Percent => Self::split_percent(total, requests),
        }
    }

    /// Splits `total` evenly.
    ///
    /// Each participant gets `floor(total / n)` at cent precision; the
    /// leftover cents go to the first participants in input order.
    ///
    /// # Example
    ///
    /// ```
    /// use divvy_core::split::Allocator;
    /// use divvy_shared::types::{Money, UserId};
    ///
    /// let users = [UserId::new(), UserId::new(), UserId::new()];
    /// let shares = Allocator::split_equal(Money::from_cents(10_000), &users).unwrap();
    /// let amounts: Vec<String> = shares.iter().map(|s| s.amount.to_string()).collect();
    /// assert_eq!(amounts, ["33.34", "33.33", "33.33"]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `SplitError::NoParticipants` for an empty participant list.
    pub fn split_equal(total: Money, participants: &[UserId]) -> Result<Vec<SplitShare>, SplitError> {
        if participants.is_empty() {
            return Err(SplitError::NoParticipants);
        }

        let count = Decimal::from(participants.len());
        let base = Money::floor(total.amount() / count);
        let allocated = Money::from_decimal(base.amount() * count);

        let mut amounts = vec![base; participants.len()];
        distribute_leftover(&mut amounts, total - allocated);

        let shares = participants
            .iter()
            .zip(amounts)
            .map(|(&user_id, amount)| SplitShare {
                user_id,
                amount,
                percent: None,
            })
            .collect();

        ensure_balanced(total, shares)
    }

    /// Uses the caller's explicit amounts unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if a request has no amount, a negative amount or an
    /// amount finer than one cent, or if the amounts miss the total by more
    /// than one cent. A gap of one cent or less fails the exact-sum check
    /// with `SplitError::Unbalanced`.
    pub fn split_exact(total: Money, requests: &[SplitRequest]) -> Result<Vec<SplitShare>, SplitError> {
        if requests.is_empty() {
            return Err(SplitError::NoParticipants);
        }

        let mut shares = Vec::with_capacity(requests.len());
        for request in requests {
            let amount = request
                .amount
                .ok_or(SplitError::MissingAmount(request.user_id))?;
            if amount < Decimal::ZERO {
                return Err(SplitError::NegativeAmount {
                    user_id: request.user_id,
                    amount,
                });
            }
            let amount = Money::try_from_exact(amount).map_err(|_| SplitError::AmountPrecision {
                user_id: request.user_id,
                amount,
            })?;
            shares.push(SplitShare {
                user_id: request.user_id,
                amount,
                percent: None,
            });
        }

        let actual: Decimal = shares.iter().map(|s| s.amount.amount()).sum();
        let difference = actual - total.amount();
        if difference.abs() > SUM_TOLERANCE {
            return Err(SplitError::SumMismatch {
                expected: total,
                actual,
                difference,
            });
        }

        ensure_balanced(total, shares)
    }

    /// Splits `total` by percentage.
    ///
    /// Each raw share `total * percent / 100` is rounded half-up to cents,
    /// then the leftover is spread cent by cent in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if a request has no percent, a percent lies outside
    /// `[0, 100]`, or the percentages miss 100 by more than 0.01.
    pub fn split_percent(total: Money, requests: &[SplitRequest]) -> Result<Vec<SplitShare>, SplitError> {
        if requests.is_empty() {
            return Err(SplitError::NoParticipants);
        }

        let mut percents = Vec::with_capacity(requests.len());
        for request in requests {
            let percent = request
                .percent
                .ok_or(SplitError::MissingPercent(request.user_id))?;
            if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                return Err(SplitError::PercentOutOfRange {
                    user_id: request.user_id,
                    percent,
                });
            }
            percents.push(percent);
        }

        let percent_sum: Decimal = percents.iter().sum();
        if (percent_sum - Decimal::ONE_HUNDRED).abs() > SUM_TOLERANCE {
            return Err(SplitError::PercentSumMismatch {
                actual: percent_sum,
            });
        }

        let mut amounts: Vec<Money> = percents
            .iter()
            .map(|p| Money::from_decimal(total.amount() * p / Decimal::ONE_HUNDRED))
            .collect();
        let rounded_sum: Money = amounts.iter().sum();
        distribute_leftover(&mut amounts, total - rounded_sum);

        let shares = requests
            .iter()
            .zip(percents)
            .zip(amounts)
            .map(|((request, percent), amount)| SplitShare {
                user_id: request.user_id,
                amount,
                percent: Some(round_half_up(percent, 2)),
            })
            .collect();

        ensure_balanced(total, shares)
    }
}

/// Spreads `leftover` over `amounts` one cent at a time in input order.
///
/// A positive leftover adds cents, wrapping around when it exceeds one cent
/// per share. A negative leftover takes cents back, skipping shares that
/// have nothing left to give.
fn distribute_leftover(amounts: &mut [Money], mut leftover: Money) {
    if amounts.is_empty() {
        return;
    }

    while leftover.is_positive() {
        for amount in amounts.iter_mut() {
            if !leftover.is_positive() {
                break;
            }
            *amount += Money::CENT;
            leftover -= Money::CENT;
        }
    }

    while leftover.is_negative() {
        let mut progressed = false;
        for amount in amounts.iter_mut() {
            if !leftover.is_negative() {
                break;
            }
            if *amount >= Money::CENT {
                *amount -= Money::CENT;
                leftover += Money::CENT;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
}

/// Post-condition shared by every mode: shares add up to the total exactly.
fn ensure_balanced(total: Money, shares: Vec<SplitShare>) -> Result<Vec<SplitShare>, SplitError> {
    let actual: Money = shares.iter().map(|s| s.amount).sum();
    if actual != total {
        return Err(SplitError::Unbalanced {
            expected: total,
            actual,
        });
    }
    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn user(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    fn users(count: u128) -> Vec<UserId> {
        (1..=count).map(user).collect()
    }

    fn amounts(shares: &[SplitShare]) -> Vec<Decimal> {
        shares.iter().map(|s| s.amount.amount()).collect()
    }

    // ========================================================================
    // EQUAL
    // ========================================================================

    #[test]
    fn test_equal_extra_cent_goes_to_first_participant() {
        let shares = Allocator::split_equal(Money::from_cents(10_000), &users(3)).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
        assert_eq!(shares[0].user_id, user(1));
        assert!(shares.iter().all(|s| s.percent.is_none()));
    }

    #[rstest]
    #[case::two_leftover_cents(dec!(10.00), 3, vec![dec!(3.34), dec!(3.33), dec!(3.33)])]
    #[case::leftover_spread(dec!(0.05), 3, vec![dec!(0.02), dec!(0.02), dec!(0.01)])]
    #[case::fewer_cents_than_people(dec!(0.02), 3, vec![dec!(0.01), dec!(0.01), dec!(0.00)])]
    #[case::even(dec!(90.00), 3, vec![dec!(30.00), dec!(30.00), dec!(30.00)])]
    #[case::single(dec!(12.34), 1, vec![dec!(12.34)])]
    #[case::zero(dec!(0.00), 2, vec![dec!(0.00), dec!(0.00)])]
    fn test_equal_cases(#[case] total: Decimal, #[case] count: u128, #[case] expected: Vec<Decimal>) {
        let total = Money::try_from_exact(total).unwrap();
        let shares = Allocator::split_equal(total, &users(count)).unwrap();
        assert_eq!(amounts(&shares), expected);
    }

    #[test]
    fn test_equal_rejects_empty_participants() {
        assert_eq!(
            Allocator::split_equal(Money::from_cents(100), &[]),
            Err(SplitError::NoParticipants)
        );
    }

    #[test]
    fn test_equal_keeps_input_order() {
        let participants = vec![user(9), user(2), user(5)];
        let shares = Allocator::split_equal(Money::from_cents(100), &participants).unwrap();
        let ids: Vec<UserId> = shares.iter().map(|s| s.user_id).collect();
        assert_eq!(ids, participants);
        assert_eq!(shares[0].amount, Money::from_cents(34));
    }

    // ========================================================================
    // EXACT
    // ========================================================================

    #[test]
    fn test_exact_returns_amounts_unchanged() {
        let requests = vec![
            SplitRequest::with_amount(user(1), dec!(60.00)),
            SplitRequest::with_amount(user(2), dec!(40.00)),
        ];
        let shares = Allocator::split_exact(Money::from_cents(10_000), &requests).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(60.00), dec!(40.00)]);
        assert_eq!(shares[1].user_id, user(2));
    }

    #[test]
    fn test_exact_sum_mismatch_reports_difference() {
        let requests = vec![
            SplitRequest::with_amount(user(1), dec!(60.00)),
            SplitRequest::with_amount(user(2), dec!(30.00)),
        ];
        let err = Allocator::split_exact(Money::from_cents(10_000), &requests).unwrap_err();
        assert_eq!(
            err,
            SplitError::SumMismatch {
                expected: Money::from_cents(10_000),
                actual: dec!(90.00),
                difference: dec!(-10.00),
            }
        );
    }

    #[test]
    fn test_exact_one_cent_gap_fails_exact_sum() {
        let requests = vec![
            SplitRequest::with_amount(user(1), dec!(60.00)),
            SplitRequest::with_amount(user(2), dec!(39.99)),
        ];
        let err = Allocator::split_exact(Money::from_cents(10_000), &requests).unwrap_err();
        assert_eq!(
            err,
            SplitError::Unbalanced {
                expected: Money::from_cents(10_000),
                actual: Money::from_cents(9_999),
            }
        );
    }

    #[test]
    fn test_exact_missing_amount() {
        let requests = vec![
            SplitRequest::with_amount(user(1), dec!(100.00)),
            SplitRequest::participant(user(2)),
        ];
        assert_eq!(
            Allocator::split_exact(Money::from_cents(10_000), &requests),
            Err(SplitError::MissingAmount(user(2)))
        );
    }

    #[rstest]
    #[case::sub_cent(dec!(50.001))]
    #[case::negative(dec!(-1.00))]
    fn test_exact_rejects_bad_amounts(#[case] bad: Decimal) {
        let requests = vec![
            SplitRequest::with_amount(user(1), dec!(50.00)),
            SplitRequest::with_amount(user(2), bad),
        ];
        let err = Allocator::split_exact(Money::from_cents(10_000), &requests).unwrap_err();
        assert!(matches!(
            err,
            SplitError::AmountPrecision { .. } | SplitError::NegativeAmount { .. }
        ));
    }

    #[test]
    fn test_exact_accepts_trailing_zeros() {
        let requests = vec![SplitRequest::with_amount(user(1), dec!(12.500))];
        let shares = Allocator::split_exact(Money::from_cents(1_250), &requests).unwrap();
        assert_eq!(shares[0].amount.to_string(), "12.50");
    }

    // ========================================================================
    // PERCENT
    // ========================================================================

    #[test]
    fn test_percent_mismatch_mentions_100() {
        let requests = vec![
            SplitRequest::with_percent(user(1), dec!(60)),
            SplitRequest::with_percent(user(2), dec!(30)),
        ];
        let err = Allocator::split_percent(Money::from_cents(10_000), &requests).unwrap_err();
        assert_eq!(err, SplitError::PercentSumMismatch { actual: dec!(90) });
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_percent_thirds_distribute_leftover_in_order() {
        let requests = vec![
            SplitRequest::with_percent(user(1), dec!(33.33)),
            SplitRequest::with_percent(user(2), dec!(33.33)),
            SplitRequest::with_percent(user(3), dec!(33.34)),
        ];
        let shares = Allocator::split_percent(Money::from_cents(10_000), &requests).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
        assert_eq!(shares[2].percent, Some(dec!(33.34)));
    }

    #[test]
    fn test_percent_rounding_surplus_is_taken_back_in_order() {
        // 0.05 * 50% = 0.025 -> 0.03 each, 0.06 total, one cent too many
        let requests = vec![
            SplitRequest::with_percent(user(1), dec!(50)),
            SplitRequest::with_percent(user(2), dec!(50)),
        ];
        let shares = Allocator::split_percent(Money::from_cents(5), &requests).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(0.02), dec!(0.03)]);
    }

    #[test]
    fn test_percent_within_tolerance_still_balances() {
        let requests = vec![
            SplitRequest::with_percent(user(1), dec!(49.995)),
            SplitRequest::with_percent(user(2), dec!(50)),
        ];
        let shares = Allocator::split_percent(Money::from_cents(100_000), &requests).unwrap();
        let sum: Money = shares.iter().map(|s| s.amount).sum();
        assert_eq!(sum, Money::from_cents(100_000));
        assert_eq!(shares[0].percent, Some(dec!(50.00)));
    }

    #[rstest]
    #[case::negative(dec!(-10))]
    #[case::above_hundred(dec!(110))]
    fn test_percent_out_of_range(#[case] percent: Decimal) {
        let requests = vec![
            SplitRequest::with_percent(user(1), percent),
            SplitRequest::with_percent(user(2), dec!(100) - percent),
        ];
        let err = Allocator::split_percent(Money::from_cents(10_000), &requests).unwrap_err();
        assert!(matches!(err, SplitError::PercentOutOfRange { user_id, .. } if user_id == user(1)));
    }

    #[test]
    fn test_percent_missing_percent() {
        let requests = vec![
            SplitRequest::with_percent(user(1), dec!(100)),
            SplitRequest::with_amount(user(2), dec!(1.00)),
        ];
        assert_eq!(
            Allocator::split_percent(Money::from_cents(10_000), &requests),
            Err(SplitError::MissingPercent(user(2)))
        );
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    #[test]
    fn test_allocate_equal_ignores_amounts() {
        let requests = vec![
            SplitRequest::with_amount(user(1), dec!(99.00)),
            SplitRequest::participant(user(2)),
        ];
        let shares = Allocator::allocate(Money::from_cents(1_000), SplitMode::Equal, &requests).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(5.00), dec!(5.00)]);
    }

    #[rstest]
    #[case(SplitMode::Equal)]
    #[case(SplitMode::Exact)]
    #[case(SplitMode::Percent)]
    fn test_allocate_rejects_empty(#[case] mode: SplitMode) {
        assert_eq!(
            Allocator::allocate(Money::from_cents(1_000), mode, &[]),
            Err(SplitError::NoParticipants)
        );
    }
}
