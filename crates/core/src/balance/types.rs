//! Balance engine types.
//!
//! The engine is generic over the participant key `P`; the service layer
//! instantiates it with `UserId`.

use std::collections::BTreeMap;

use divvy_shared::types::{Money, UserId};
use serde::{Deserialize, Serialize};

/// One share of one expense: `participant` owes `payer` this `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitLine<P> {
    /// Who paid the expense.
    pub payer: P,
    /// Whose share this is.
    pub participant: P,
    /// The share amount.
    pub amount: Money,
}

/// A recorded payment from `payer` to `payee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementLine<P> {
    /// Who paid.
    pub payer: P,
    /// Who received.
    pub payee: P,
    /// Amount paid.
    pub amount: Money,
}

/// `debtor` owes `creditor` a strictly positive `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RawDebt<P> {
    /// Who owes.
    pub debtor: P,
    /// Who is owed.
    pub creditor: P,
    /// Amount owed, always > 0.
    pub amount: Money,
}

/// A suggested payment from `payer` to `payee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer<P> {
    /// Who should pay.
    pub payer: P,
    /// Who should receive.
    pub payee: P,
    /// Amount to pay, always > 0.
    pub amount: Money,
}

/// Signed position per participant: positive is owed, negative owes.
pub type NetBalances<P> = BTreeMap<P, Money>;

/// Every derived view of one group, computed together and cached as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBalances {
    /// Directed pairwise debts, ordered by `(debtor, creditor)`.
    pub raw: Vec<RawDebt<UserId>>,
    /// Net position of every group member, zero for settled members.
    pub net: NetBalances<UserId>,
    /// Greedy transfer plan that zeroes every net position.
    pub simplified: Vec<Transfer<UserId>>,
}
