//! Entry repository for journal posting database operations.
//!
//! All validation happens in memory before the first insert, the period
//! lock is consulted inside the write transaction, and the per-company
//! entry number is allocated under a row lock, so concurrent posters
//! either fully commit or leave no trace.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use tally_core::posting::{
    AccountRef, EntryInput, LineInput, PostingError, PostingService, build_reversal,
};
use tally_shared::error::AppError;
use tally_shared::types::{AccountId, CompanyId, JournalEntryId, UserId};
use uuid::Uuid;

use crate::audit::{self, AuditEvent};
use crate::entities::{accounts, journal_entries, journal_lines, period_locks};

/// Error types for entry operations.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// Validation of the entry input failed.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// The entry date falls inside a locked period.
    #[error("Date {0} falls inside a locked period")]
    PeriodLocked(NaiveDate),

    /// Entry not found.
    #[error("Entry not found: {0}")]
    NotFound(JournalEntryId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::Posting(inner) => match inner {
                PostingError::UnknownAccount(_) => Self::NotFound(inner.to_string()),
                PostingError::UnbalancedEntry { .. } => {
                    Self::InvariantViolation(inner.to_string())
                }
                _ => Self::Validation(inner.to_string()),
            },
            EntryError::PeriodLocked(_) => Self::PeriodLocked(err.to_string()),
            EntryError::NotFound(_) => Self::NotFound(err.to_string()),
            EntryError::Database(inner) => super::map_db_err(&inner),
        }
    }
}

/// A journal entry with its lines.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Journal lines, in line-number order.
    pub lines: Vec<journal_lines::Model>,
}

/// Entry repository for journal posting.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a journal entry.
    ///
    /// Validates every invariant in memory, then inside a single
    /// transaction checks the period lock, allocates the entry number,
    /// and inserts the header, lines, and audit record.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the date is locked, or the
    /// database operation fails. On error nothing is persisted.
    pub async fn post_entry(&self, input: EntryInput) -> Result<EntryWithLines, EntryError> {
        let txn = self.db.begin().await?;
        let posted = post_within(&txn, &input, None).await?;
        txn.commit().await?;
        Ok(posted)
    }

    /// Posts a reversal of an existing entry.
    ///
    /// The reversal swaps each line's debit and credit and is dated
    /// `reversal_date`, which must fall in an open period. The original
    /// entry is never mutated.
    ///
    /// # Errors
    ///
    /// Returns an error if the original entry is missing, the reversal
    /// date is locked, or the database operation fails.
    pub async fn reverse_entry(
        &self,
        entry_id: JournalEntryId,
        reversal_date: NaiveDate,
        created_by: UserId,
    ) -> Result<EntryWithLines, EntryError> {
        let original = self.get_entry(entry_id).await?;

        let original_input = EntryInput {
            company_id: CompanyId::from_uuid(original.entry.company_id),
            entry_date: original.entry.entry_date,
            description: original.entry.description.clone(),
            reference: original.entry.reference.clone(),
            lines: original
                .lines
                .iter()
                .map(|line| LineInput {
                    account_id: AccountId::from_uuid(line.account_id),
                    debit: line.debit,
                    credit: line.credit,
                    memo: line.memo.clone(),
                })
                .collect(),
            created_by,
        };
        let draft = build_reversal(&original_input, entry_id, reversal_date, created_by);

        let txn = self.db.begin().await?;
        let posted = post_within(&txn, &draft.input, Some(entry_id)).await?;
        txn.commit().await?;
        Ok(posted)
    }

    /// Fetches an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the entry does not exist.
    pub async fn get_entry(&self, entry_id: JournalEntryId) -> Result<EntryWithLines, EntryError> {
        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(EntryError::NotFound(entry_id))?;

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.eq(entry.id))
            .order_by_asc(journal_lines::Column::LineNumber)
            .all(&self.db)
            .await?;

        Ok(EntryWithLines { entry, lines })
    }

    /// Lists a company's entries within a date range, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_entries(
        &self,
        company_id: CompanyId,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<journal_entries::Model>, EntryError> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(company_id.into_inner()));

        if let Some(from) = date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        let entries = query
            .order_by_desc(journal_entries::Column::EntryNumber)
            .all(&self.db)
            .await?;
        Ok(entries)
    }
}

/// Posts an entry inside an existing transaction.
///
/// Shared by direct posting, reversals, and the depreciation batch so
/// every writer goes through identical validation, lock checking, and
/// number allocation.
pub(crate) async fn post_within(
    txn: &DatabaseTransaction,
    input: &EntryInput,
    reverses: Option<JournalEntryId>,
) -> Result<EntryWithLines, EntryError> {
    let account_refs = load_account_refs(txn, input.company_id).await?;
    let totals = PostingService::validate(input, |id| account_refs.get(&id).cloned())?;

    // The counter row doubles as the company's serialization point: the
    // allocation upsert takes its row lock before the lock-state read, so
    // a period lock engaged concurrently is either committed and visible
    // here, or waits on this row until the entry commits.
    let entry_number = allocate_entry_number(txn, input.company_id).await?;

    ensure_date_open(txn, input.company_id, input.entry_date).await?;

    let now = Utc::now().into();
    let entry_id = JournalEntryId::new();

    let entry = journal_entries::ActiveModel {
        id: Set(entry_id.into_inner()),
        company_id: Set(input.company_id.into_inner()),
        entry_number: Set(entry_number),
        entry_date: Set(input.entry_date),
        description: Set(input.description.clone()),
        reference: Set(input.reference.clone()),
        total_debit: Set(totals.total_debit),
        total_credit: Set(totals.total_credit),
        reverses_entry_id: Set(reverses.map(JournalEntryId::into_inner)),
        created_by: Set(input.created_by.into_inner()),
        created_at: Set(now),
    };
    let entry = entry.insert(txn).await?;

    let mut lines = Vec::with_capacity(input.lines.len());
    for (index, line_input) in input.lines.iter().enumerate() {
        let line = journal_lines::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_id: Set(entry.id),
            account_id: Set(line_input.account_id.into_inner()),
            line_number: Set(i32::try_from(index + 1).unwrap_or(i32::MAX)),
            debit: Set(line_input.debit),
            credit: Set(line_input.credit),
            memo: Set(line_input.memo.clone()),
            created_at: Set(now),
        };
        lines.push(line.insert(txn).await?);
    }

    tracing::info!(
        company_id = %input.company_id,
        entry_number,
        total_debit = %totals.total_debit,
        "journal entry posted"
    );

    audit::record(
        txn,
        AuditEvent::info(
            input.company_id.into_inner(),
            Some(input.created_by.into_inner()),
            "post",
            "journal_entries",
            entry.id,
        )
        .with_new_values(serde_json::json!({
            "entry_number": entry_number,
            "entry_date": input.entry_date,
            "total_debit": totals.total_debit,
            "total_credit": totals.total_credit,
            "reverses_entry_id": reverses.map(JournalEntryId::into_inner),
        })),
    )
    .await?;

    Ok(EntryWithLines { entry, lines })
}

/// Fails with `PeriodLocked` if `date` falls inside an engaged lock.
///
/// Callers must already hold the company's counter row lock (via
/// [`lock_company`] or the allocation upsert) so the read cannot race a
/// concurrently committing lock.
pub(crate) async fn ensure_date_open(
    txn: &DatabaseTransaction,
    company_id: CompanyId,
    date: NaiveDate,
) -> Result<(), EntryError> {
    let locked = period_locks::Entity::find()
        .filter(period_locks::Column::CompanyId.eq(company_id.into_inner()))
        .filter(period_locks::Column::IsLocked.eq(true))
        .filter(period_locks::Column::PeriodStart.lte(date))
        .filter(period_locks::Column::PeriodEnd.gte(date))
        .one(txn)
        .await?;

    if locked.is_some() {
        return Err(EntryError::PeriodLocked(date));
    }
    Ok(())
}

/// Takes the company's counter row lock for the rest of the transaction
/// without advancing the counter.
///
/// Entry posting and period-lock engagement both pass through this row,
/// so overlap validation and lock-state reads for one company serialize
/// against concurrent writers instead of racing on stale snapshots.
pub(crate) async fn lock_company(
    txn: &DatabaseTransaction,
    company_id: CompanyId,
) -> Result<(), DbErr> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "INSERT INTO entry_counters (company_id, next_number, updated_at)
         VALUES ($1, 1, now())
         ON CONFLICT (company_id)
         DO UPDATE SET updated_at = now()",
        [company_id.into_inner().into()],
    );
    txn.execute(stmt).await?;
    Ok(())
}

/// Allocates the next entry number for a company.
///
/// The upsert takes a row lock on the counter for the remainder of the
/// transaction, serializing concurrent posters; a rolled-back allocation
/// releases the number.
async fn allocate_entry_number(
    txn: &DatabaseTransaction,
    company_id: CompanyId,
) -> Result<i64, EntryError> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "INSERT INTO entry_counters (company_id, next_number, updated_at)
         VALUES ($1, 2, now())
         ON CONFLICT (company_id)
         DO UPDATE SET next_number = entry_counters.next_number + 1, updated_at = now()
         RETURNING next_number - 1 AS entry_number",
        [company_id.into_inner().into()],
    );

    let row = txn
        .query_one(stmt)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("entry counter allocation returned no row".into()))?;
    let entry_number: i64 = row.try_get("", "entry_number")?;
    Ok(entry_number)
}

/// Loads a company's accounts as validation refs, keyed by id.
async fn load_account_refs(
    txn: &DatabaseTransaction,
    company_id: CompanyId,
) -> Result<HashMap<AccountId, AccountRef>, EntryError> {
    let rows = accounts::Entity::find()
        .filter(accounts::Column::CompanyId.eq(company_id.into_inner()))
        .all(txn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = AccountId::from_uuid(row.id);
            (
                id,
                AccountRef {
                    id,
                    company_id: CompanyId::from_uuid(row.company_id),
                    is_active: row.is_active,
                },
            )
        })
        .collect())
}
