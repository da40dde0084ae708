//! Journal entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, CompanyId, UserId, approx_equal};

/// Input for a single journal line.
///
/// Exactly one of `debit`/`credit` must be positive; the other is zero.
/// Enforced server-side by [`crate::posting::PostingService::validate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    /// The account this line posts to.
    pub account_id: AccountId,
    /// Debit amount (zero for credit lines).
    pub debit: Decimal,
    /// Credit amount (zero for debit lines).
    pub credit: Decimal,
    /// Optional memo for this line.
    pub memo: Option<String>,
}

impl LineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            memo: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            memo: None,
        }
    }
}

/// Input for posting a journal entry.
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// The company this entry belongs to.
    pub company_id: CompanyId,
    /// The entry date.
    pub entry_date: NaiveDate,
    /// A description of the entry.
    pub description: String,
    /// Optional external reference (e.g. invoice number).
    pub reference: Option<String>,
    /// The journal lines (must have at least 2).
    pub lines: Vec<LineInput>,
    /// The user posting the entry.
    pub created_by: UserId,
}

/// Entry totals for validation and display.
#[derive(Debug, Clone)]
pub struct EntryTotals {
    /// Sum of all debit amounts.
    pub total_debit: Decimal,
    /// Sum of all credit amounts.
    pub total_credit: Decimal,
    /// Whether debits equal credits within the balance tolerance.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: approx_equal(total_debit, total_credit),
        }
    }

    /// Returns the exact debit minus credit difference.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_constructors() {
        let account = AccountId::new();
        let d = LineInput::debit(account, dec!(100));
        assert_eq!(d.debit, dec!(100));
        assert_eq!(d.credit, Decimal::ZERO);

        let c = LineInput::credit(account, dec!(100));
        assert_eq!(c.credit, dec!(100));
        assert_eq!(c.debit, Decimal::ZERO);
    }

    #[test]
    fn test_totals_balanced_within_tolerance() {
        let totals = EntryTotals::new(dec!(100.00), dec!(100.01));
        assert!(totals.is_balanced);
        assert_eq!(totals.delta(), dec!(-0.01));
    }

    #[test]
    fn test_totals_unbalanced() {
        let totals = EntryTotals::new(dec!(100.00), dec!(99.98));
        assert!(!totals.is_balanced);
        assert_eq!(totals.delta(), dec!(0.02));
    }
}
