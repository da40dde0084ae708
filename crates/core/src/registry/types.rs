//! Account domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, CompanyId};

/// Account classification in the chart of accounts.
///
/// The type determines the account's normal side:
/// - Asset/Expense accounts are debit-normal
/// - Liability/Equity/Revenue accounts are credit-normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (debit-normal).
    Asset,
    /// Liability account (credit-normal).
    Liability,
    /// Equity account (credit-normal).
    Equity,
    /// Revenue account (credit-normal).
    Revenue,
    /// Expense account (debit-normal).
    Expense,
}

impl AccountType {
    /// Returns true if the account type is debit-normal.
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Calculates the signed balance change contributed by one line.
    ///
    /// Debit-normal: `debit - credit`; credit-normal: `credit - debit`.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

/// A chart of accounts entry.
///
/// Accounts are company-scoped, identified by a per-company unique `code`,
/// and form a tree through `parent_id`. Balances are never stored here;
/// they are always derived by summing posted journal lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Company this account belongs to.
    pub company_id: CompanyId,
    /// Account code, unique within the company.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Parent account for hierarchical structure.
    pub parent_id: Option<AccountId>,
    /// Soft-deactivation flag. Accounts referenced by posted lines are
    /// never hard-deleted.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(AccountType::Asset, true)]
    #[case(AccountType::Expense, true)]
    #[case(AccountType::Liability, false)]
    #[case(AccountType::Equity, false)]
    #[case(AccountType::Revenue, false)]
    fn test_normal_side(#[case] account_type: AccountType, #[case] debit_normal: bool) {
        assert_eq!(account_type.is_debit_normal(), debit_normal);
    }

    #[test]
    fn test_balance_change_debit_normal() {
        assert_eq!(AccountType::Asset.balance_change(dec!(100), dec!(0)), dec!(100));
        assert_eq!(AccountType::Asset.balance_change(dec!(0), dec!(40)), dec!(-40));
        assert_eq!(AccountType::Expense.balance_change(dec!(70), dec!(30)), dec!(40));
    }

    #[test]
    fn test_balance_change_credit_normal() {
        assert_eq!(AccountType::Revenue.balance_change(dec!(0), dec!(100)), dec!(100));
        assert_eq!(AccountType::Liability.balance_change(dec!(25), dec!(0)), dec!(-25));
        assert_eq!(AccountType::Equity.balance_change(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_display() {
        assert_eq!(AccountType::Asset.to_string(), "asset");
        assert_eq!(AccountType::Revenue.to_string(), "revenue");
    }
}
