//! Period lock state machine and date checks.
//!
//! A period lock covers an inclusive date range for one company. Mutation of
//! any record dated inside a lock with `is_locked = true` must be rejected
//! before persistence begins, and the check must share the writer's
//! transaction so a lock cannot land mid-write.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tally_shared::types::{CompanyId, PeriodLockId, UserId};

use super::error::PeriodLockError;

/// An administrative lock over a reporting interval.
///
/// Locks transition UNLOCKED -> LOCKED -> UNLOCKED only through explicit
/// admin calls; unlocking is a logged high-severity override, never a
/// deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodLock {
    /// Unique identifier.
    pub id: PeriodLockId,
    /// Company this lock belongs to.
    pub company_id: CompanyId,
    /// First locked date (inclusive).
    pub period_start: NaiveDate,
    /// Last locked date (inclusive).
    pub period_end: NaiveDate,
    /// Whether the lock is currently engaged.
    pub is_locked: bool,
    /// The admin who last engaged the lock.
    pub locked_by: UserId,
    /// When the lock was last engaged.
    pub locked_at: chrono::DateTime<chrono::Utc>,
    /// When the row was last updated.
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl PeriodLock {
    /// Returns true if the given date falls within this lock's range.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date <= self.period_end
    }
}

/// Returns true if `date` falls inside any engaged lock.
#[must_use]
pub fn is_date_locked(locks: &[PeriodLock], date: NaiveDate) -> bool {
    locks
        .iter()
        .any(|lock| lock.is_locked && lock.contains_date(date))
}

/// Validates a new lock range against existing lock rows.
///
/// The range must be well-formed and must not overlap any existing row,
/// engaged or not (disengaged rows are kept for the audit trail and may be
/// re-engaged). Gaps between ranges are permitted.
///
/// # Errors
///
/// Returns `InvalidRange` or `OverlappingPeriod`.
pub fn validate_new_range(
    existing: &[PeriodLock],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), PeriodLockError> {
    if start > end {
        return Err(PeriodLockError::InvalidRange { start, end });
    }

    let overlaps = existing
        .iter()
        .any(|lock| start <= lock.period_end && end >= lock.period_start);
    if overlaps {
        return Err(PeriodLockError::OverlappingPeriod { start, end });
    }

    Ok(())
}

/// Proposes the next lock range for a company.
///
/// Returns `[last lock end + 1 day, end of that month]` to encourage
/// contiguous ranges. With no existing locks the current month of `today`
/// is proposed.
#[must_use]
pub fn suggest_next_lock_period(locks: &[PeriodLock], today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = locks
        .iter()
        .map(|lock| lock.period_end)
        .max()
        .and_then(|last_end| last_end.checked_add_days(Days::new(1)))
        .unwrap_or_else(|| today.with_day(1).unwrap_or(today));

    (start, end_of_month(start))
}

/// Returns the last day of the month containing `date`.
fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    first_of_next
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lock(start: NaiveDate, end: NaiveDate, engaged: bool) -> PeriodLock {
        PeriodLock {
            id: PeriodLockId::new(),
            company_id: CompanyId::new(),
            period_start: start,
            period_end: end,
            is_locked: engaged,
            locked_by: UserId::new(),
            locked_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_contains_date_inclusive() {
        let l = lock(date(2026, 1, 1), date(2026, 1, 31), true);
        assert!(l.contains_date(date(2026, 1, 1)));
        assert!(l.contains_date(date(2026, 1, 31)));
        assert!(l.contains_date(date(2026, 1, 15)));
        assert!(!l.contains_date(date(2026, 2, 1)));
        assert!(!l.contains_date(date(2025, 12, 31)));
    }

    #[test]
    fn test_is_date_locked_respects_engaged_flag() {
        let locks = vec![
            lock(date(2026, 1, 1), date(2026, 1, 31), false),
            lock(date(2026, 2, 1), date(2026, 2, 28), true),
        ];
        assert!(!is_date_locked(&locks, date(2026, 1, 15)));
        assert!(is_date_locked(&locks, date(2026, 2, 15)));
        assert!(!is_date_locked(&locks, date(2026, 3, 1)));
    }

    #[test]
    fn test_validate_new_range_rejects_inverted() {
        let result = validate_new_range(&[], date(2026, 2, 1), date(2026, 1, 1));
        assert!(matches!(result, Err(PeriodLockError::InvalidRange { .. })));
    }

    #[test]
    fn test_validate_new_range_rejects_overlap() {
        let existing = vec![lock(date(2026, 1, 1), date(2026, 1, 31), true)];

        // Touching the existing end is an overlap
        let result = validate_new_range(&existing, date(2026, 1, 31), date(2026, 2, 28));
        assert!(matches!(
            result,
            Err(PeriodLockError::OverlappingPeriod { .. })
        ));

        // Containing the existing range is an overlap
        let result = validate_new_range(&existing, date(2025, 12, 1), date(2026, 2, 28));
        assert!(matches!(
            result,
            Err(PeriodLockError::OverlappingPeriod { .. })
        ));
    }

    #[test]
    fn test_validate_new_range_overlap_includes_disengaged_rows() {
        let existing = vec![lock(date(2026, 1, 1), date(2026, 1, 31), false)];
        let result = validate_new_range(&existing, date(2026, 1, 15), date(2026, 2, 15));
        assert!(matches!(
            result,
            Err(PeriodLockError::OverlappingPeriod { .. })
        ));
    }

    #[test]
    fn test_validate_new_range_allows_gaps() {
        let existing = vec![lock(date(2026, 1, 1), date(2026, 1, 31), true)];
        assert!(validate_new_range(&existing, date(2026, 3, 1), date(2026, 3, 31)).is_ok());
    }

    #[test]
    fn test_suggest_next_after_last_lock() {
        let locks = vec![
            lock(date(2026, 1, 1), date(2026, 1, 31), true),
            lock(date(2026, 2, 1), date(2026, 2, 28), true),
        ];
        let (start, end) = suggest_next_lock_period(&locks, date(2026, 6, 10));
        assert_eq!(start, date(2026, 3, 1));
        assert_eq!(end, date(2026, 3, 31));
    }

    #[test]
    fn test_suggest_next_mid_month_boundary() {
        // A lock ending mid-month suggests the remainder of that month
        let locks = vec![lock(date(2026, 4, 1), date(2026, 4, 15), true)];
        let (start, end) = suggest_next_lock_period(&locks, date(2026, 6, 1));
        assert_eq!(start, date(2026, 4, 16));
        assert_eq!(end, date(2026, 4, 30));
    }

    #[test]
    fn test_suggest_next_without_locks_uses_current_month() {
        let (start, end) = suggest_next_lock_period(&[], date(2026, 6, 10));
        assert_eq!(start, date(2026, 6, 1));
        assert_eq!(end, date(2026, 6, 30));
    }

    #[test]
    fn test_suggest_next_crosses_year_boundary() {
        let locks = vec![lock(date(2025, 12, 1), date(2025, 12, 31), true)];
        let (start, end) = suggest_next_lock_period(&locks, date(2026, 2, 1));
        assert_eq!(start, date(2026, 1, 1));
        assert_eq!(end, date(2026, 1, 31));
    }
}
