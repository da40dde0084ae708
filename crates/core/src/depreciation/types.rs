//! Fixed asset and depreciation schedule types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, CompanyId, FixedAssetId};

/// Depreciation method for a fixed asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    /// Equal periodic expense over the asset's useful life.
    StraightLine,
    /// Double-declining balance: expense proportional to remaining book value.
    DecliningBalance,
}

impl std::fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StraightLine => write!(f, "straight_line"),
            Self::DecliningBalance => write!(f, "declining_balance"),
        }
    }
}

/// A long-lived asset depreciated monthly through the ledger.
///
/// `book_value` is always derived as `purchase_cost - accumulated_depreciation`
/// and never drops below `residual_value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedAsset {
    pub id: FixedAssetId,
    pub company_id: CompanyId,
    /// Unique per company.
    pub asset_code: String,
    pub name: String,
    pub purchase_date: NaiveDate,
    pub purchase_cost: Decimal,
    pub residual_value: Decimal,
    pub useful_life_years: u32,
    pub method: DepreciationMethod,
    pub accumulated_depreciation: Decimal,
    /// Date of the last applied depreciation period, if any.
    pub last_depreciation_date: Option<NaiveDate>,
    /// Expense account debited by each depreciation entry.
    pub expense_account_id: AccountId,
    /// Contra-asset account credited by each depreciation entry.
    pub accumulated_account_id: AccountId,
    /// False once disposed; disposed assets are never depreciated again.
    pub is_active: bool,
}

impl FixedAsset {
    /// Current book value.
    #[must_use]
    pub fn book_value(&self) -> Decimal {
        self.purchase_cost - self.accumulated_depreciation
    }

    /// Total number of monthly periods over the asset's life.
    #[must_use]
    pub fn total_periods(&self) -> u32 {
        self.useful_life_years.saturating_mul(12)
    }
}

/// One computed period of a depreciation schedule. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepreciationScheduleRow {
    /// 1-based period index.
    pub period: u32,
    pub depreciation_amount: Decimal,
    pub accumulated_depreciation: Decimal,
    pub book_value_after: Decimal,
}
