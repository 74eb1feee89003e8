//! Split allocation.
//!
//! This module divides an expense total among participants:
//! - `Equal` splits with cent leftovers to the earliest participants
//! - `Exact` splits checked against the total
//! - `Percent` splits rounded half-up with leftover distribution

pub mod allocator;
pub mod error;
pub mod types;

#[cfg(test)]
mod allocator_props;

pub use allocator::Allocator;
pub use error::SplitError;
pub use types::{SplitMode, SplitRequest, SplitShare};
