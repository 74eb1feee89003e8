//! Core business logic for Divvy.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `split` - Exact-cent allocation of an expense across participants
//! - `balance` - Raw debts, net positions and debt simplification
//! - `expense` - Expense validation against group membership
//! - `settlement` - Settlement validation

pub mod balance;
pub mod expense;
pub mod settlement;
pub mod split;
