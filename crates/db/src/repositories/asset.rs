//! Fixed asset repository and depreciation batch runner.
//!
//! Each depreciation step is one transaction: the asset row is locked,
//! the next schedule row computed, the matching journal entry posted,
//! and the asset state updated. Posting and the asset update commit or
//! roll back together, so the asset sub-ledger and the general ledger
//! never diverge.

use chrono::{NaiveDate, Utc};
use futures::StreamExt;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tally_core::depreciation::{
    self, DepreciationError, DepreciationScheduleRow, FixedAsset,
};
use tally_core::posting::{EntryInput, LineInput};
use tally_shared::error::AppError;
use tally_shared::types::{AccountId, CompanyId, FixedAssetId, UserId};

use crate::audit::{self, AuditEvent};
use crate::entities::{accounts, fixed_assets};
use crate::repositories::entry::{self, EntryError};

/// Error types for asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// A depreciation domain rule was violated.
    #[error(transparent)]
    Depreciation(#[from] DepreciationError),

    /// Asset code already exists within the company.
    #[error("Asset code '{0}' already exists")]
    DuplicateCode(String),

    /// Asset not found.
    #[error("Asset not found: {0}")]
    NotFound(FixedAssetId),

    /// A depreciation account is missing, inactive, or in the wrong company.
    #[error("Invalid depreciation account: {0}")]
    InvalidAccount(AccountId),

    /// Posting the depreciation entry failed.
    #[error(transparent)]
    Posting(#[from] EntryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AssetError> for AppError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::Depreciation(ref inner) => match inner {
                DepreciationError::AssetDisposed | DepreciationError::FullyDepreciated => {
                    Self::Validation(err.to_string())
                }
                _ => Self::InvariantViolation(err.to_string()),
            },
            AssetError::DuplicateCode(_) | AssetError::InvalidAccount(_) => {
                Self::InvariantViolation(err.to_string())
            }
            AssetError::NotFound(_) => Self::NotFound(err.to_string()),
            AssetError::Posting(inner) => inner.into(),
            AssetError::Database(inner) => super::map_db_err(&inner),
        }
    }
}

/// Input for creating a fixed asset.
#[derive(Debug, Clone)]
pub struct CreateAssetInput {
    pub company_id: CompanyId,
    /// Unique per company.
    pub asset_code: String,
    pub name: String,
    pub purchase_date: NaiveDate,
    pub purchase_cost: rust_decimal::Decimal,
    pub residual_value: rust_decimal::Decimal,
    pub useful_life_years: u32,
    pub method: depreciation::DepreciationMethod,
    /// Expense account debited by each depreciation entry.
    pub expense_account_id: AccountId,
    /// Contra-asset account credited by each depreciation entry.
    pub accumulated_account_id: AccountId,
    pub created_by: UserId,
}

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Assets that received one depreciation period.
    pub processed: Vec<FixedAssetId>,
    /// Assets skipped (already processed for the date, or fully depreciated).
    pub skipped: Vec<FixedAssetId>,
    /// Assets whose step rolled back, with the failure message.
    pub failed: Vec<(FixedAssetId, String)>,
}

/// Outcome of a single asset step within a batch.
enum StepOutcome {
    Applied,
    Skipped,
}

/// Fixed asset repository.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    db: DatabaseConnection,
}

impl AssetRepository {
    /// Creates a new asset repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fixed asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the acquisition parameters are invalid, the
    /// code is taken, either depreciation account is unusable, or the
    /// database operation fails.
    pub async fn create_asset(
        &self,
        input: CreateAssetInput,
    ) -> Result<fixed_assets::Model, AssetError> {
        depreciation::validate_asset_inputs(
            input.purchase_cost,
            input.residual_value,
            input.useful_life_years,
        )?;

        let duplicate = fixed_assets::Entity::find()
            .filter(fixed_assets::Column::CompanyId.eq(input.company_id.into_inner()))
            .filter(fixed_assets::Column::AssetCode.eq(input.asset_code.clone()))
            .one(&self.db)
            .await?;
        if duplicate.is_some() {
            return Err(AssetError::DuplicateCode(input.asset_code));
        }

        self.ensure_posting_account(input.company_id, input.expense_account_id)
            .await?;
        self.ensure_posting_account(input.company_id, input.accumulated_account_id)
            .await?;

        let now = Utc::now().into();
        let txn = self.db.begin().await?;

        let asset = fixed_assets::ActiveModel {
            id: Set(FixedAssetId::new().into_inner()),
            company_id: Set(input.company_id.into_inner()),
            asset_code: Set(input.asset_code.clone()),
            name: Set(input.name.clone()),
            purchase_date: Set(input.purchase_date),
            purchase_cost: Set(input.purchase_cost),
            residual_value: Set(input.residual_value),
            useful_life_years: Set(i32::try_from(input.useful_life_years).unwrap_or(i32::MAX)),
            depreciation_method: Set(input.method.into()),
            accumulated_depreciation: Set(rust_decimal::Decimal::ZERO),
            last_depreciation_date: Set(None),
            expense_account_id: Set(input.expense_account_id.into_inner()),
            accumulated_account_id: Set(input.accumulated_account_id.into_inner()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = asset.insert(&txn).await?;

        audit::record(
            &txn,
            AuditEvent::info(
                input.company_id.into_inner(),
                Some(input.created_by.into_inner()),
                "create",
                "fixed_assets",
                model.id,
            )
            .with_new_values(serde_json::json!({
                "asset_code": model.asset_code,
                "purchase_cost": model.purchase_cost,
                "residual_value": model.residual_value,
                "useful_life_years": model.useful_life_years,
                "depreciation_method": model.depreciation_method,
            })),
        )
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Disposes an asset. Terminal: the asset is never depreciated again.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is missing or the database operation
    /// fails.
    pub async fn dispose_asset(
        &self,
        asset_id: FixedAssetId,
        disposed_by: UserId,
    ) -> Result<fixed_assets::Model, AssetError> {
        let model = self.find_asset(asset_id).await?;

        let txn = self.db.begin().await?;

        let mut active: fixed_assets::ActiveModel = model.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        audit::record(
            &txn,
            AuditEvent::info(
                updated.company_id,
                Some(disposed_by.into_inner()),
                "dispose",
                "fixed_assets",
                updated.id,
            )
            .warning(),
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Fetches an asset row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the asset does not exist.
    pub async fn get_asset(
        &self,
        asset_id: FixedAssetId,
    ) -> Result<fixed_assets::Model, AssetError> {
        self.find_asset(asset_id).await
    }

    /// Computes the full projected schedule for an asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset is missing or the database operation
    /// fails.
    pub async fn compute_schedule(
        &self,
        asset_id: FixedAssetId,
    ) -> Result<Vec<DepreciationScheduleRow>, AssetError> {
        let model = self.find_asset(asset_id).await?;
        Ok(depreciation::compute_schedule(&to_domain(model)))
    }

    /// Applies one depreciation period to every eligible asset of a company.
    ///
    /// Assets already processed for `as_of_date` are skipped (re-running
    /// is a no-op), as are disposed and fully depreciated assets. Assets
    /// are processed concurrently up to `concurrency`, each in its own
    /// transaction; one asset failing never affects the others.
    ///
    /// # Errors
    ///
    /// Returns an error only if the candidate query fails; per-asset
    /// failures are collected in the outcome.
    pub async fn run_batch(
        &self,
        company_id: CompanyId,
        as_of_date: NaiveDate,
        run_by: UserId,
        concurrency: usize,
    ) -> Result<BatchOutcome, AssetError> {
        let candidates: Vec<FixedAssetId> = fixed_assets::Entity::find()
            .filter(fixed_assets::Column::CompanyId.eq(company_id.into_inner()))
            .filter(fixed_assets::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(fixed_assets::Column::LastDepreciationDate.is_null())
                    .add(fixed_assets::Column::LastDepreciationDate.ne(as_of_date)),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| FixedAssetId::from_uuid(model.id))
            .collect();

        tracing::info!(
            company_id = %company_id,
            %as_of_date,
            candidates = candidates.len(),
            "depreciation batch started"
        );

        let results = futures::stream::iter(candidates)
            .map(|asset_id| async move {
                (
                    asset_id,
                    self.depreciate_one(asset_id, as_of_date, run_by).await,
                )
            })
            .buffer_unordered(concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut outcome = BatchOutcome::default();
        for (asset_id, result) in results {
            match result {
                Ok(StepOutcome::Applied) => outcome.processed.push(asset_id),
                Ok(StepOutcome::Skipped) => outcome.skipped.push(asset_id),
                Err(err) => {
                    tracing::error!(
                        asset_id = %asset_id,
                        error = %err,
                        "depreciation step failed"
                    );
                    outcome.failed.push((asset_id, err.to_string()));
                }
            }
        }

        tracing::info!(
            company_id = %company_id,
            processed = outcome.processed.len(),
            skipped = outcome.skipped.len(),
            failed = outcome.failed.len(),
            "depreciation batch finished"
        );
        Ok(outcome)
    }

    /// Applies one depreciation period to one asset.
    ///
    /// The asset row is locked `FOR UPDATE` for the whole step, so a
    /// concurrent batch for the same date observes the updated
    /// `last_depreciation_date` and skips.
    async fn depreciate_one(
        &self,
        asset_id: FixedAssetId,
        as_of_date: NaiveDate,
        run_by: UserId,
    ) -> Result<StepOutcome, AssetError> {
        let txn = self.db.begin().await?;

        let model = fixed_assets::Entity::find_by_id(asset_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AssetError::NotFound(asset_id))?;

        // Re-check under the row lock; a concurrent step may have run.
        if !model.is_active || model.last_depreciation_date == Some(as_of_date) {
            txn.rollback().await?;
            return Ok(StepOutcome::Skipped);
        }

        let asset = to_domain(model.clone());
        let step = match depreciation::next_step(&asset) {
            Ok(step) => step,
            Err(DepreciationError::FullyDepreciated | DepreciationError::AssetDisposed) => {
                txn.rollback().await?;
                return Ok(StepOutcome::Skipped);
            }
            Err(other) => {
                txn.rollback().await?;
                return Err(other.into());
            }
        };

        self.post_depreciation_entry(&txn, &asset, &step, as_of_date, run_by)
            .await?;

        let new_accumulated = step.accumulated_depreciation;
        let mut active: fixed_assets::ActiveModel = model.into();
        active.accumulated_depreciation = Set(new_accumulated);
        active.last_depreciation_date = Set(Some(as_of_date));
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        audit::record(
            &txn,
            AuditEvent::info(
                updated.company_id,
                Some(run_by.into_inner()),
                "depreciate",
                "fixed_assets",
                updated.id,
            )
            .with_new_values(serde_json::json!({
                "period": step.period,
                "depreciation_amount": step.depreciation_amount,
                "accumulated_depreciation": step.accumulated_depreciation,
                "book_value_after": step.book_value_after,
                "as_of_date": as_of_date,
            })),
        )
        .await?;

        txn.commit().await?;
        Ok(StepOutcome::Applied)
    }

    /// Posts the journal entry for one depreciation step on the step's
    /// transaction: debit depreciation expense, credit accumulated
    /// depreciation.
    async fn post_depreciation_entry(
        &self,
        txn: &DatabaseTransaction,
        asset: &FixedAsset,
        step: &DepreciationScheduleRow,
        as_of_date: NaiveDate,
        run_by: UserId,
    ) -> Result<(), AssetError> {
        let input = EntryInput {
            company_id: asset.company_id,
            entry_date: as_of_date,
            description: format!(
                "Depreciation {} period {}",
                asset.asset_code, step.period
            ),
            reference: Some(asset.asset_code.clone()),
            lines: vec![
                LineInput::debit(asset.expense_account_id, step.depreciation_amount),
                LineInput::credit(asset.accumulated_account_id, step.depreciation_amount),
            ],
            created_by: run_by,
        };

        entry::post_within(txn, &input, None).await?;
        Ok(())
    }

    async fn ensure_posting_account(
        &self,
        company_id: CompanyId,
        account_id: AccountId,
    ) -> Result<(), AssetError> {
        let account = accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AssetError::InvalidAccount(account_id))?;
        if account.company_id != company_id.into_inner() || !account.is_active {
            return Err(AssetError::InvalidAccount(account_id));
        }
        Ok(())
    }

    async fn find_asset(&self, asset_id: FixedAssetId) -> Result<fixed_assets::Model, AssetError> {
        fixed_assets::Entity::find_by_id(asset_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AssetError::NotFound(asset_id))
    }
}

/// Maps a database row to the core domain type.
fn to_domain(model: fixed_assets::Model) -> FixedAsset {
    FixedAsset {
        id: FixedAssetId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        asset_code: model.asset_code,
        name: model.name,
        purchase_date: model.purchase_date,
        purchase_cost: model.purchase_cost,
        residual_value: model.residual_value,
        useful_life_years: u32::try_from(model.useful_life_years).unwrap_or(1),
        method: model.depreciation_method.into(),
        accumulated_depreciation: model.accumulated_depreciation,
        last_depreciation_date: model.last_depreciation_date,
        expense_account_id: AccountId::from_uuid(model.expense_account_id),
        accumulated_account_id: AccountId::from_uuid(model.accumulated_account_id),
        is_active: model.is_active,
    }
}
