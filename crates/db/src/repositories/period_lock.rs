//! Period lock repository.
//!
//! Lock rows gate all historical mutation. Writers consult the lock
//! inside their own transactions (see the entry repository); this
//! repository manages the rows themselves.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tally_core::period::{self, PeriodLock, PeriodLockError};
use tally_shared::error::AppError;
use tally_shared::types::{CompanyId, PeriodLockId, UserId};

use crate::audit::{self, AuditEvent};
use crate::entities::period_locks;
use crate::repositories::entry;

/// Error types for period lock operations.
#[derive(Debug, thiserror::Error)]
pub enum LockRepoError {
    /// A lock domain rule was violated.
    #[error(transparent)]
    Lock(#[from] PeriodLockError),

    /// Lock row not found.
    #[error("Period lock not found: {0}")]
    NotFound(PeriodLockId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LockRepoError> for AppError {
    fn from(err: LockRepoError) -> Self {
        match err {
            LockRepoError::Lock(inner) => match inner {
                PeriodLockError::PeriodLocked(_) => Self::PeriodLocked(inner.to_string()),
                PeriodLockError::InvalidRange { .. } => Self::Validation(inner.to_string()),
                PeriodLockError::OverlappingPeriod { .. } => {
                    Self::InvariantViolation(inner.to_string())
                }
            },
            LockRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            LockRepoError::Database(inner) => super::map_db_err(&inner),
        }
    }
}

/// Period lock repository.
#[derive(Debug, Clone)]
pub struct PeriodLockRepository {
    db: DatabaseConnection,
}

impl PeriodLockRepository {
    /// Creates a new period lock repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Locks a period.
    ///
    /// The range must not overlap any existing lock row, engaged or not;
    /// gaps between ranges are permitted. The overlap check and the
    /// insert run in one transaction holding the company's counter row
    /// lock, so two concurrent calls with overlapping ranges serialize
    /// and the loser sees the winner's committed row.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is malformed, overlaps an existing
    /// row, or the database operation fails.
    pub async fn lock_period(
        &self,
        company_id: CompanyId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        locked_by: UserId,
    ) -> Result<period_locks::Model, LockRepoError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;
        entry::lock_company(&txn, company_id).await?;

        let existing = load_locks_on(&txn, company_id).await?;
        period::validate_new_range(&existing, period_start, period_end)?;

        let lock = period_locks::ActiveModel {
            id: Set(PeriodLockId::new().into_inner()),
            company_id: Set(company_id.into_inner()),
            period_start: Set(period_start),
            period_end: Set(period_end),
            is_locked: Set(true),
            locked_by: Set(locked_by.into_inner()),
            locked_at: Set(now.into()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let model = lock.insert(&txn).await?;

        audit::record(
            &txn,
            AuditEvent::info(
                company_id.into_inner(),
                Some(locked_by.into_inner()),
                "lock",
                "period_locks",
                model.id,
            )
            .with_new_values(serde_json::json!({
                "period_start": period_start,
                "period_end": period_end,
            })),
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            company_id = %company_id,
            %period_start,
            %period_end,
            "period locked"
        );
        Ok(model)
    }

    /// Unlocks a period.
    ///
    /// The row is kept (disengaged) so it can be re-engaged later; the
    /// override is always audited at critical severity.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is missing or the database operation
    /// fails.
    pub async fn unlock_period(
        &self,
        lock_id: PeriodLockId,
        unlocked_by: UserId,
    ) -> Result<period_locks::Model, LockRepoError> {
        let model = self.find_lock(lock_id).await?;

        let txn = self.db.begin().await?;

        let mut active: period_locks::ActiveModel = model.into();
        active.is_locked = Set(false);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        audit::record(
            &txn,
            AuditEvent::info(
                updated.company_id,
                Some(unlocked_by.into_inner()),
                "unlock",
                "period_locks",
                updated.id,
            )
            .with_new_values(serde_json::json!({
                "period_start": updated.period_start,
                "period_end": updated.period_end,
            }))
            .critical(),
        )
        .await?;

        txn.commit().await?;

        tracing::warn!(
            company_id = %updated.company_id,
            period_start = %updated.period_start,
            period_end = %updated.period_end,
            "period unlocked"
        );
        Ok(updated)
    }

    /// Re-engages a previously unlocked period.
    ///
    /// Holds the company's counter row lock so an in-flight posting for
    /// the same company either commits before the period re-engages or
    /// observes the engaged lock and is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is missing or the database operation
    /// fails.
    pub async fn relock_period(
        &self,
        lock_id: PeriodLockId,
        locked_by: UserId,
    ) -> Result<period_locks::Model, LockRepoError> {
        let model = self.find_lock(lock_id).await?;

        let now = Utc::now();
        let txn = self.db.begin().await?;
        entry::lock_company(&txn, CompanyId::from_uuid(model.company_id)).await?;

        let mut active: period_locks::ActiveModel = model.into();
        active.is_locked = Set(true);
        active.locked_by = Set(locked_by.into_inner());
        active.locked_at = Set(now.into());
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await?;

        audit::record(
            &txn,
            AuditEvent::info(
                updated.company_id,
                Some(locked_by.into_inner()),
                "lock",
                "period_locks",
                updated.id,
            ),
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Returns true if the date falls inside any engaged lock.
    ///
    /// Advisory read for UI and pre-checks; writers repeat the check on
    /// their own transaction before persisting.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn is_date_locked(
        &self,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> Result<bool, LockRepoError> {
        let locks = self.load_locks(company_id).await?;
        Ok(period::is_date_locked(&locks, date))
    }

    /// Proposes the next lock range for a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn suggest_next_period(
        &self,
        company_id: CompanyId,
        today: NaiveDate,
    ) -> Result<(NaiveDate, NaiveDate), LockRepoError> {
        let locks = self.load_locks(company_id).await?;
        Ok(period::suggest_next_lock_period(&locks, today))
    }

    /// Lists all lock rows for a company as domain values.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn load_locks(&self, company_id: CompanyId) -> Result<Vec<PeriodLock>, LockRepoError> {
        load_locks_on(&self.db, company_id).await
    }

    async fn find_lock(&self, lock_id: PeriodLockId) -> Result<period_locks::Model, LockRepoError> {
        period_locks::Entity::find_by_id(lock_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LockRepoError::NotFound(lock_id))
    }
}

/// Loads a company's lock rows on the given connection or transaction.
async fn load_locks_on<C: ConnectionTrait>(
    conn: &C,
    company_id: CompanyId,
) -> Result<Vec<PeriodLock>, LockRepoError> {
    let rows = period_locks::Entity::find()
        .filter(period_locks::Column::CompanyId.eq(company_id.into_inner()))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(to_domain).collect())
}

/// Maps a database row to the core domain type.
fn to_domain(model: period_locks::Model) -> PeriodLock {
    PeriodLock {
        id: PeriodLockId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        period_start: model.period_start,
        period_end: model.period_end,
        is_locked: model.is_locked,
        locked_by: UserId::from_uuid(model.locked_by),
        locked_at: model.locked_at.to_utc(),
        updated_at: model.updated_at.to_utc(),
    }
}
