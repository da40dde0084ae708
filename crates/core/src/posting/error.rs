//! Posting error types.
//!
//! All variants carry the offending index or id so callers can render a
//! precise message without the core formatting user-facing text.

use rust_decimal::Decimal;
use tally_shared::types::AccountId;
use thiserror::Error;

/// Errors that can occur while validating a journal entry.
#[derive(Debug, Error)]
pub enum PostingError {
    /// Entry must have at least 2 lines.
    #[error("Entry must have at least 2 lines, got {0}")]
    InsufficientLines(usize),

    /// Entry debits and credits differ by more than the tolerance.
    /// The message states the exact debit - credit delta.
    #[error("Entry is not balanced: debit {debit} - credit {credit} = {delta}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
        /// Exact debit minus credit difference.
        delta: Decimal,
    },

    /// Line has neither a debit nor a credit amount.
    #[error("Line {0} has neither a debit nor a credit amount")]
    EmptyLine(usize),

    /// Line has both a debit and a credit amount.
    #[error("Line {0} has both a debit and a credit amount")]
    BothSidesSet(usize),

    /// Line carries a negative amount.
    #[error("Line {0} carries a negative amount")]
    NegativeAmount(usize),

    /// Referenced account does not exist.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Referenced account is inactive.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Referenced account belongs to a different company.
    #[error("Account {0} belongs to a different company")]
    AccountWrongCompany(AccountId),
}
