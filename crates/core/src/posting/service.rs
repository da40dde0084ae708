//! Posting service for journal entry validation.
//!
//! This module provides the core business logic for validating journal
//! entries before they are persisted. Every invariant is checked in memory
//! first, so a failed validation can never leave partial rows behind.

use rust_decimal::Decimal;
use tally_shared::types::{AccountId, CompanyId};

use super::error::PostingError;
use super::types::{EntryInput, EntryTotals, LineInput};

/// Information about an account needed for validation.
#[derive(Debug, Clone)]
pub struct AccountRef {
    /// The account ID.
    pub id: AccountId,
    /// The company the account belongs to.
    pub company_id: CompanyId,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Posting service for journal entry validation.
///
/// This service contains pure business logic with no database dependencies.
/// The account lookup is injected so the same validation runs against a live
/// repository or an in-memory fixture.
pub struct PostingService;

impl PostingService {
    /// Validate a journal entry before persisting.
    ///
    /// Checks, in order:
    /// 1. At least 2 lines
    /// 2. Per line: non-negative amounts, exactly one positive side
    /// 3. Per line: account exists, is active, belongs to the entry's company
    /// 4. Sum of debits equals sum of credits within the balance tolerance
    ///
    /// # Errors
    ///
    /// Returns `PostingError` naming the first violated invariant; the
    /// unbalanced variant carries the exact debit - credit delta.
    pub fn validate<A>(input: &EntryInput, account_lookup: A) -> Result<EntryTotals, PostingError>
    where
        A: Fn(AccountId) -> Option<AccountRef>,
    {
        if input.lines.len() < 2 {
            return Err(PostingError::InsufficientLines(input.lines.len()));
        }

        for (index, line) in input.lines.iter().enumerate() {
            Self::validate_line(index, line)?;

            let account = account_lookup(line.account_id)
                .ok_or(PostingError::UnknownAccount(line.account_id))?;
            if account.company_id != input.company_id {
                return Err(PostingError::AccountWrongCompany(line.account_id));
            }
            if !account.is_active {
                return Err(PostingError::AccountInactive(line.account_id));
            }
        }

        let totals = Self::totals(&input.lines);
        if !totals.is_balanced {
            return Err(PostingError::UnbalancedEntry {
                debit: totals.total_debit,
                credit: totals.total_credit,
                delta: totals.delta(),
            });
        }

        Ok(totals)
    }

    /// Validates a single line's amount invariants.
    fn validate_line(index: usize, line: &LineInput) -> Result<(), PostingError> {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(PostingError::NegativeAmount(index));
        }
        let has_debit = line.debit > Decimal::ZERO;
        let has_credit = line.credit > Decimal::ZERO;
        match (has_debit, has_credit) {
            (true, true) => Err(PostingError::BothSidesSet(index)),
            (false, false) => Err(PostingError::EmptyLine(index)),
            _ => Ok(()),
        }
    }

    /// Calculates entry totals from lines.
    #[must_use]
    pub fn totals(lines: &[LineInput]) -> EntryTotals {
        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
        EntryTotals::new(total_debit, total_credit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_shared::types::UserId;

    fn make_input(company_id: CompanyId, lines: Vec<LineInput>) -> EntryInput {
        EntryInput {
            company_id,
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            description: "Test entry".to_string(),
            reference: None,
            lines,
            created_by: UserId::new(),
        }
    }

    fn lookup_for(company_id: CompanyId) -> impl Fn(AccountId) -> Option<AccountRef> {
        move |id| {
            Some(AccountRef {
                id,
                company_id,
                is_active: true,
            })
        }
    }

    #[test]
    fn test_balanced_entry_accepted() {
        let company = CompanyId::new();
        let input = make_input(
            company,
            vec![
                LineInput::debit(AccountId::new(), dec!(100)),
                LineInput::credit(AccountId::new(), dec!(100)),
            ],
        );

        let totals = PostingService::validate(&input, lookup_for(company)).unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.total_debit, dec!(100));
        assert_eq!(totals.total_credit, dec!(100));
    }

    #[test]
    fn test_unbalanced_entry_reports_delta() {
        let company = CompanyId::new();
        let input = make_input(
            company,
            vec![
                LineInput::debit(AccountId::new(), dec!(100.00)),
                LineInput::credit(AccountId::new(), dec!(58.50)),
            ],
        );

        let err = PostingService::validate(&input, lookup_for(company)).unwrap_err();
        match err {
            PostingError::UnbalancedEntry { delta, .. } => assert_eq!(delta, dec!(41.50)),
            other => panic!("expected UnbalancedEntry, got {other:?}"),
        }
    }

    #[test]
    fn test_off_by_one_cent_is_balanced() {
        let company = CompanyId::new();
        let input = make_input(
            company,
            vec![
                LineInput::debit(AccountId::new(), dec!(33.34)),
                LineInput::credit(AccountId::new(), dec!(33.33)),
            ],
        );
        assert!(PostingService::validate(&input, lookup_for(company)).is_ok());
    }

    #[test]
    fn test_single_line_rejected() {
        let company = CompanyId::new();
        let input = make_input(company, vec![LineInput::debit(AccountId::new(), dec!(100))]);

        let err = PostingService::validate(&input, lookup_for(company)).unwrap_err();
        assert!(matches!(err, PostingError::InsufficientLines(1)));
    }

    #[test]
    fn test_both_sides_set_rejected() {
        let company = CompanyId::new();
        let bad = LineInput {
            account_id: AccountId::new(),
            debit: dec!(50),
            credit: dec!(50),
            memo: None,
        };
        let input = make_input(company, vec![bad, LineInput::credit(AccountId::new(), dec!(0.01))]);

        let err = PostingService::validate(&input, lookup_for(company)).unwrap_err();
        assert!(matches!(err, PostingError::BothSidesSet(0)));
    }

    #[test]
    fn test_empty_line_rejected() {
        let company = CompanyId::new();
        let empty = LineInput {
            account_id: AccountId::new(),
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            memo: None,
        };
        let input = make_input(
            company,
            vec![LineInput::debit(AccountId::new(), dec!(10)), empty],
        );

        let err = PostingService::validate(&input, lookup_for(company)).unwrap_err();
        assert!(matches!(err, PostingError::EmptyLine(1)));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let company = CompanyId::new();
        let negative = LineInput {
            account_id: AccountId::new(),
            debit: dec!(-10),
            credit: Decimal::ZERO,
            memo: None,
        };
        let input = make_input(
            company,
            vec![negative, LineInput::credit(AccountId::new(), dec!(10))],
        );

        let err = PostingService::validate(&input, lookup_for(company)).unwrap_err();
        assert!(matches!(err, PostingError::NegativeAmount(0)));
    }

    #[test]
    fn test_unknown_account_rejected() {
        let company = CompanyId::new();
        let input = make_input(
            company,
            vec![
                LineInput::debit(AccountId::new(), dec!(100)),
                LineInput::credit(AccountId::new(), dec!(100)),
            ],
        );

        let err = PostingService::validate(&input, |_| None).unwrap_err();
        assert!(matches!(err, PostingError::UnknownAccount(_)));
    }

    #[test]
    fn test_inactive_account_rejected() {
        let company = CompanyId::new();
        let input = make_input(
            company,
            vec![
                LineInput::debit(AccountId::new(), dec!(100)),
                LineInput::credit(AccountId::new(), dec!(100)),
            ],
        );

        let err = PostingService::validate(&input, |id| {
            Some(AccountRef {
                id,
                company_id: company,
                is_active: false,
            })
        })
        .unwrap_err();
        assert!(matches!(err, PostingError::AccountInactive(_)));
    }

    #[test]
    fn test_cross_company_account_rejected() {
        let company = CompanyId::new();
        let other = CompanyId::new();
        let input = make_input(
            company,
            vec![
                LineInput::debit(AccountId::new(), dec!(100)),
                LineInput::credit(AccountId::new(), dec!(100)),
            ],
        );

        let err = PostingService::validate(&input, |id| {
            Some(AccountRef {
                id,
                company_id: other,
                is_active: true,
            })
        })
        .unwrap_err();
        assert!(matches!(err, PostingError::AccountWrongCompany(_)));
    }

    #[test]
    fn test_multi_line_split_entry() {
        let company = CompanyId::new();
        let input = make_input(
            company,
            vec![
                LineInput::debit(AccountId::new(), dec!(700)),
                LineInput::debit(AccountId::new(), dec!(300)),
                LineInput::credit(AccountId::new(), dec!(1000)),
            ],
        );

        let totals = PostingService::validate(&input, lookup_for(company)).unwrap();
        assert_eq!(totals.total_debit, dec!(1000));
        assert_eq!(totals.total_credit, dec!(1000));
    }
}
