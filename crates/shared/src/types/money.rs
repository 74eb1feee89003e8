//! Money type with exact cent precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and keeps every value at scale 2.
//! Any value built from an arbitrary decimal is rounded half-up (away from zero).

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of decimal places carried by every [`Money`] value.
pub const MONEY_SCALE: u32 = 2;

/// Errors raised when building a [`Money`] value from external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The input is not a decimal number.
    #[error("Invalid amount: {0}")]
    Parse(String),

    /// The input carries more than two decimal places.
    #[error("Amount {0} has more than 2 decimal places")]
    TooPrecise(Decimal),
}

/// Rounds a decimal to `dp` places using round-half-up (away from zero).
#[must_use]
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded
}

/// A signed monetary amount in cents.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
/// Positive and negative values are both valid; callers decide which sign
/// means "owes" and which means "is owed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Zero, at cent scale.
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));

    /// One cent, the smallest representable unit.
    pub const CENT: Self = Self(Decimal::from_parts(1, 0, 0, false, MONEY_SCALE));

    /// Creates an amount from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, MONEY_SCALE))
    }

    /// Creates an amount from any decimal, rounding half-up to cents.
    #[must_use]
    pub fn from_decimal(value: Decimal) -> Self {
        Self(round_half_up(value, MONEY_SCALE))
    }

    /// Creates an amount from a decimal, rounding toward negative infinity.
    #[must_use]
    pub fn floor(value: Decimal) -> Self {
        let mut floored = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToNegativeInfinity);
        floored.rescale(MONEY_SCALE);
        Self(floored)
    }

    /// Creates an amount from a decimal that must already be expressed in cents.
    ///
    /// Trailing zeros are accepted (`12.500` is `12.50`), extra precision is not.
    pub fn try_from_exact(value: Decimal) -> Result<Self, MoneyError> {
        if value.normalize().scale() > MONEY_SCALE {
            return Err(MoneyError::TooPrecise(value));
        }
        let mut exact = value;
        exact.rescale(MONEY_SCALE);
        Ok(Self(exact))
    }

    /// Returns the underlying decimal (always scale 2).
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns the amount as a whole number of cents.
    #[must_use]
    pub fn cents(self) -> i128 {
        let mut scaled = self.0;
        scaled.rescale(MONEY_SCALE);
        scaled.mantissa()
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns true if the amount is strictly less than zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| MoneyError::Parse(s.to_string()))?;
        Self::try_from_exact(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Serialized as a string with exactly two decimals, e.g. `"20.00"`.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts JSON strings or numbers, rejecting more than two decimals.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::try_from_exact(value).map_err(serde::de::Error::custom)
    }
}
