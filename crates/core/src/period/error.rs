//! Period lock error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during period lock operations.
#[derive(Debug, Error)]
pub enum PeriodLockError {
    /// The date falls inside a locked period.
    #[error("Date {0} falls inside a locked period")]
    PeriodLocked(NaiveDate),

    /// Range end precedes range start.
    #[error("Invalid period range: {start} is after {end}")]
    InvalidRange {
        /// Requested period start.
        start: NaiveDate,
        /// Requested period end.
        end: NaiveDate,
    },

    /// The new range overlaps an existing lock row.
    #[error("Period [{start}, {end}] overlaps an existing lock")]
    OverlappingPeriod {
        /// Requested period start.
        start: NaiveDate,
        /// Requested period end.
        end: NaiveDate,
    },
}
