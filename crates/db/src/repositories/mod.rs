//! Repository layer for data access.

use sea_orm::error::SqlErr;
use sea_orm::DbErr;
use tally_shared::error::AppError;

pub mod account;
pub mod asset;
pub mod entry;
pub mod period_lock;

pub use account::AccountRepository;
pub use asset::AssetRepository;
pub use entry::EntryRepository;
pub use period_lock::PeriodLockRepository;

/// Maps a low-level database error into the application taxonomy.
///
/// A unique-constraint violation means a concurrent writer won the race
/// after in-memory validation passed, so the caller should retry the
/// whole operation. Anything else is a persistence failure.
pub(crate) fn map_db_err(err: &DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::ConcurrencyConflict(err.to_string())
        }
        _ => AppError::Persistence(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_db_error_is_persistence() {
        let err = DbErr::Custom("connection reset".into());
        let mapped = map_db_err(&err);
        assert!(matches!(mapped, AppError::Persistence(_)));
        assert!(!mapped.is_retryable());
    }
}
