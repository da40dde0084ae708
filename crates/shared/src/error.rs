//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Every repository error maps into one of these categories at the boundary.
/// Validation is always completed before any persistence call begins, so a
/// `Validation` or `InvariantViolation` error guarantees zero persisted rows.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input. Recoverable; surfaced verbatim to the caller.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A cross-record invariant would be broken (unbalanced entry,
    /// duplicate code, cyclic parent). Rejected before any write.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The target date falls inside a locked reporting period.
    #[error("Period locked: {0}")]
    PeriodLocked(String),

    /// Unknown account, asset, or entry.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Lost update detected. The caller retries the whole operation.
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Store unavailable. Fatal for the current request; no partial state.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvariantViolation(_) => 422,
            Self::PeriodLocked(_) => 423,
            Self::NotFound(_) => 404,
            Self::ConcurrencyConflict(_) => 409,
            Self::Persistence(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
            Self::PeriodLocked(_) => "PERIOD_LOCKED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Returns true if the caller should retry the whole operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(
            AppError::InvariantViolation(String::new()).status_code(),
            422
        );
        assert_eq!(AppError::PeriodLocked(String::new()).status_code(), 423);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(
            AppError::ConcurrencyConflict(String::new()).status_code(),
            409
        );
        assert_eq!(AppError::Persistence(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::PeriodLocked(String::new()).error_code(),
            "PERIOD_LOCKED"
        );
        assert_eq!(
            AppError::ConcurrencyConflict(String::new()).error_code(),
            "CONCURRENCY_CONFLICT"
        );
    }

    #[test]
    fn test_only_conflicts_are_retryable() {
        assert!(AppError::ConcurrencyConflict(String::new()).is_retryable());
        assert!(!AppError::Validation(String::new()).is_retryable());
        assert!(!AppError::PeriodLocked(String::new()).is_retryable());
        assert!(!AppError::Persistence(String::new()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::PeriodLocked("2026-01-15 is inside a locked period".into()).to_string(),
            "Period locked: 2026-01-15 is inside a locked period"
        );
    }
}
