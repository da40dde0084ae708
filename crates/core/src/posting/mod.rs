//! Double-entry journal posting logic.
//!
//! This module implements the pure half of the ledger posting engine:
//! - Entry and line input types
//! - In-memory validation of every invariant before persistence
//! - Totals with tolerance-based balance checks
//! - Reversing-entry construction for corrections
//! - Error types for posting operations

pub mod error;
pub mod reversal;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::PostingError;
pub use reversal::{ReversalDraft, build_reversal};
pub use service::{AccountRef, PostingService};
pub use types::{EntryInput, EntryTotals, LineInput};
