//! Reversal entry construction.
//!
//! A posted entry is never mutated; correcting it means posting a new entry
//! with every line's debit and credit swapped. The reversal is a plain draft
//! that flows through the same validation path as any other entry.

use chrono::NaiveDate;
use tally_shared::types::{JournalEntryId, UserId};

use super::types::{EntryInput, LineInput};

/// A reversal entry derived from an existing posted entry.
#[derive(Debug, Clone)]
pub struct ReversalDraft {
    /// The entry being reversed.
    pub reverses: JournalEntryId,
    /// The full input for the reversal entry.
    pub input: EntryInput,
}

/// Builds a reversal draft from a posted entry's lines.
///
/// Each line's debit and credit are swapped and the description gains a
/// `Reversal:` prefix. The reversal is dated `reversal_date`, which must be
/// an open (unlocked) date; the period check happens at posting time.
#[must_use]
pub fn build_reversal(
    original: &EntryInput,
    original_id: JournalEntryId,
    reversal_date: NaiveDate,
    created_by: UserId,
) -> ReversalDraft {
    let lines = original
        .lines
        .iter()
        .map(|line| LineInput {
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            memo: line.memo.clone(),
        })
        .collect();

    ReversalDraft {
        reverses: original_id,
        input: EntryInput {
            company_id: original.company_id,
            entry_date: reversal_date,
            description: format!("Reversal: {}", original.description),
            reference: original.reference.clone(),
            lines,
            created_by,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, CompanyId};

    #[test]
    fn test_reversal_swaps_sides() {
        let original = EntryInput {
            company_id: CompanyId::new(),
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            description: "Office supplies".to_string(),
            reference: Some("INV-42".to_string()),
            lines: vec![
                LineInput::debit(AccountId::new(), dec!(250)),
                LineInput::credit(AccountId::new(), dec!(250)),
            ],
            created_by: UserId::new(),
        };
        let original_id = JournalEntryId::new();
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        let draft = build_reversal(&original, original_id, date, UserId::new());

        assert_eq!(draft.reverses, original_id);
        assert_eq!(draft.input.entry_date, date);
        assert_eq!(draft.input.description, "Reversal: Office supplies");
        assert_eq!(draft.input.lines[0].debit, dec!(0));
        assert_eq!(draft.input.lines[0].credit, dec!(250));
        assert_eq!(draft.input.lines[1].debit, dec!(250));
        assert_eq!(draft.input.lines[1].credit, dec!(0));
    }

    #[test]
    fn test_reversal_keeps_accounts_and_reference() {
        let account_a = AccountId::new();
        let account_b = AccountId::new();
        let original = EntryInput {
            company_id: CompanyId::new(),
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            description: "Accrual".to_string(),
            reference: Some("ACC-7".to_string()),
            lines: vec![
                LineInput::debit(account_a, dec!(100)),
                LineInput::credit(account_b, dec!(100)),
            ],
            created_by: UserId::new(),
        };

        let draft = build_reversal(
            &original,
            JournalEntryId::new(),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            UserId::new(),
        );

        assert_eq!(draft.input.lines[0].account_id, account_a);
        assert_eq!(draft.input.lines[1].account_id, account_b);
        assert_eq!(draft.input.reference.as_deref(), Some("ACC-7"));
        assert_eq!(draft.input.company_id, original.company_id);
    }
}
