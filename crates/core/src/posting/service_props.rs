//! Property-based tests for PostingService.
//!
//! - Property 1: Balance Integrity
//! - Property 2: Reversal Symmetry

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, CompanyId, JournalEntryId, UserId};

use super::error::PostingError;
use super::reversal::build_reversal;
use super::service::{AccountRef, PostingService};
use super::types::{EntryInput, LineInput};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Helper to create an entry input.
fn make_input(company_id: CompanyId, lines: Vec<LineInput>) -> EntryInput {
    EntryInput {
        company_id,
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        description: "Test entry".to_string(),
        reference: None,
        lines,
        created_by: UserId::new(),
    }
}

/// Account lookup that resolves every account as active in the given company.
fn ok_lookup(company_id: CompanyId) -> impl Fn(AccountId) -> Option<AccountRef> {
    move |id| {
        Some(AccountRef {
            id,
            company_id,
            is_active: true,
        })
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // =========================================================================
    // Property 1: Balance Integrity
    // =========================================================================

    /// Property 1.1: Balanced entries are accepted.
    ///
    /// *For any* entry with equal total debits and credits, validation SHALL
    /// succeed with balanced totals.
    #[test]
    fn prop_balanced_entry_accepted(
        amount in positive_amount(),
    ) {
        let company = CompanyId::new();
        let input = make_input(company, vec![
            LineInput::debit(AccountId::new(), amount),
            LineInput::credit(AccountId::new(), amount),
        ]);

        let result = PostingService::validate(&input, ok_lookup(company));

        prop_assert!(result.is_ok(), "Balanced entry should be accepted");
        let totals = result.unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.total_debit, totals.total_credit);
    }

    /// Property 1.2: Entries off by more than the tolerance are rejected.
    ///
    /// *For any* entry where |debit - credit| > 0.01, validation SHALL fail
    /// with UnbalancedEntry carrying the exact delta.
    #[test]
    fn prop_unbalanced_entry_rejected(
        debit_amount in positive_amount(),
        credit_amount in positive_amount(),
    ) {
        prop_assume!((debit_amount - credit_amount).abs() > Decimal::new(1, 2));

        let company = CompanyId::new();
        let input = make_input(company, vec![
            LineInput::debit(AccountId::new(), debit_amount),
            LineInput::credit(AccountId::new(), credit_amount),
        ]);

        let result = PostingService::validate(&input, ok_lookup(company));

        match result {
            Err(PostingError::UnbalancedEntry { delta, .. }) => {
                prop_assert_eq!(delta, debit_amount - credit_amount);
            }
            other => prop_assert!(false, "expected UnbalancedEntry, got {:?}", other),
        }
    }

    /// Property 1.3: Split entries that sum to the same total are accepted.
    ///
    /// *For any* pair of debit amounts matched by a single credit of their
    /// sum, validation SHALL succeed.
    #[test]
    fn prop_split_entry_balanced_accepted(
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let company = CompanyId::new();
        let input = make_input(company, vec![
            LineInput::debit(AccountId::new(), amount1),
            LineInput::debit(AccountId::new(), amount2),
            LineInput::credit(AccountId::new(), amount1 + amount2),
        ]);

        let result = PostingService::validate(&input, ok_lookup(company));
        prop_assert!(result.is_ok(), "Split balanced entry should be accepted");
    }

    /// Property 1.4: Entries within the 0.01 tolerance are accepted.
    ///
    /// *For any* balanced entry perturbed by exactly one cent on one side,
    /// validation SHALL still succeed.
    #[test]
    fn prop_within_tolerance_accepted(
        amount in positive_amount(),
    ) {
        let company = CompanyId::new();
        let input = make_input(company, vec![
            LineInput::debit(AccountId::new(), amount + Decimal::new(1, 2)),
            LineInput::credit(AccountId::new(), amount),
        ]);

        let result = PostingService::validate(&input, ok_lookup(company));
        prop_assert!(result.is_ok(), "One-cent delta should be within tolerance");
    }

    // =========================================================================
    // Property 2: Reversal Symmetry
    // =========================================================================

    /// Property 2.1: A reversal of a valid entry is itself valid.
    ///
    /// *For any* balanced entry, its reversal SHALL pass validation with the
    /// same totals.
    #[test]
    fn prop_reversal_of_valid_entry_is_valid(
        amount in positive_amount(),
    ) {
        let company = CompanyId::new();
        let input = make_input(company, vec![
            LineInput::debit(AccountId::new(), amount),
            LineInput::credit(AccountId::new(), amount),
        ]);
        let original_totals = PostingService::validate(&input, ok_lookup(company)).unwrap();

        let draft = build_reversal(
            &input,
            JournalEntryId::new(),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            UserId::new(),
        );
        let reversal_totals = PostingService::validate(&draft.input, ok_lookup(company)).unwrap();

        prop_assert!(reversal_totals.is_balanced);
        prop_assert_eq!(reversal_totals.total_debit, original_totals.total_credit);
        prop_assert_eq!(reversal_totals.total_credit, original_totals.total_debit);
    }

    /// Property 2.2: Reversing twice restores the original line amounts.
    ///
    /// *For any* entry, reversal applied twice SHALL yield lines with the
    /// original debit and credit amounts.
    #[test]
    fn prop_double_reversal_restores_lines(
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let company = CompanyId::new();
        let input = make_input(company, vec![
            LineInput::debit(AccountId::new(), amount1),
            LineInput::debit(AccountId::new(), amount2),
            LineInput::credit(AccountId::new(), amount1 + amount2),
        ]);
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let user = UserId::new();

        let once = build_reversal(&input, JournalEntryId::new(), date, user);
        let twice = build_reversal(&once.input, JournalEntryId::new(), date, user);

        for (original, restored) in input.lines.iter().zip(twice.input.lines.iter()) {
            prop_assert_eq!(original.account_id, restored.account_id);
            prop_assert_eq!(original.debit, restored.debit);
            prop_assert_eq!(original.credit, restored.credit);
        }
    }
}
