//! Expense rules.
//!
//! Validates submitted expenses against group membership, allocates their
//! shares and re-checks stored splits against the expense total.

pub mod error;
pub mod service;
pub mod types;

pub use error::ExpenseError;
pub use service::ExpenseService;
pub use types::{ExpenseDraft, MAX_DESCRIPTION_LEN, PreparedExpense};
