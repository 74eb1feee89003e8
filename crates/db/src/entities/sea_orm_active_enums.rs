//! `SeaORM` active enums mapped to Postgres enum types.

use divvy_core::split::SplitMode;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Postgres `split_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "split_type")]
pub enum SplitType {
    /// Even split.
    #[sea_orm(string_value = "EQUAL")]
    Equal,
    /// Explicit amounts.
    #[sea_orm(string_value = "EXACT")]
    Exact,
    /// Percentages.
    #[sea_orm(string_value = "PERCENT")]
    Percent,
}

impl From<SplitMode> for SplitType {
    fn from(mode: SplitMode) -> Self {
        match mode {
            SplitMode::Equal => Self::Equal,
            SplitMode::Exact => Self::Exact,
            SplitMode::Percent => Self::Percent,
        }
    }
}

impl From<SplitType> for SplitMode {
    fn from(split_type: SplitType) -> Self {
        match split_type {
            SplitType::Equal => Self::Equal,
            SplitType::Exact => Self::Exact,
            SplitType::Percent => Self::Percent,
        }
    }
}
