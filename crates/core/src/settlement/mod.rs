//! Settlement rules.

pub mod error;
pub mod validation;

pub use error::SettlementError;
pub use validation::{NewSettlement, SettlementDraft, validate_settlement};
