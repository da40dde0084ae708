//! Database enum types mapped to Postgres enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<tally_core::registry::AccountType> for AccountType {
    fn from(value: tally_core::registry::AccountType) -> Self {
        match value {
            tally_core::registry::AccountType::Asset => Self::Asset,
            tally_core::registry::AccountType::Liability => Self::Liability,
            tally_core::registry::AccountType::Equity => Self::Equity,
            tally_core::registry::AccountType::Revenue => Self::Revenue,
            tally_core::registry::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for tally_core::registry::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

/// Depreciation method for fixed assets.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "depreciation_method")]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    #[sea_orm(string_value = "straight_line")]
    StraightLine,
    #[sea_orm(string_value = "declining_balance")]
    DecliningBalance,
}

impl From<tally_core::depreciation::DepreciationMethod> for DepreciationMethod {
    fn from(value: tally_core::depreciation::DepreciationMethod) -> Self {
        match value {
            tally_core::depreciation::DepreciationMethod::StraightLine => Self::StraightLine,
            tally_core::depreciation::DepreciationMethod::DecliningBalance => {
                Self::DecliningBalance
            }
        }
    }
}

impl From<DepreciationMethod> for tally_core::depreciation::DepreciationMethod {
    fn from(value: DepreciationMethod) -> Self {
        match value {
            DepreciationMethod::StraightLine => Self::StraightLine,
            DepreciationMethod::DecliningBalance => Self::DecliningBalance,
        }
    }
}

/// Audit record severity.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "audit_severity")]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    #[sea_orm(string_value = "info")]
    Info,
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "critical")]
    Critical,
}
