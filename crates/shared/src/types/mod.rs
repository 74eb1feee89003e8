//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{MONEY_SCALE, Money, MoneyError, round_half_up};
pub use pagination::{PageMeta, PageRequest, PageResponse};
