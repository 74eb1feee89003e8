//! Balance engine.
//!
//! This module turns a group's ledger into derived views:
//! - Raw pairwise debts from splits and settlements
//! - Net positions per participant
//! - Greedy simplification into a short list of transfers
//! - A per-group cache and the service that ties them to a ledger reader

pub mod cache;
pub mod error;
pub mod raw;
pub mod service;
pub mod simplify;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use cache::BalanceCache;
pub use error::BalanceError;
pub use raw::raw_balances;
pub use service::{BalanceService, LedgerReader, compute_group_balances};
pub use simplify::{net_balances, simplify, simplify_raw};
pub use types::{GroupBalances, NetBalances, RawDebt, SettlementLine, SplitLine, Transfer};
