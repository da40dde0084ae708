//! Account repository for chart-of-accounts database operations.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use tally_core::registry::{self, Account, AccountNode, RegistryError};
use tally_shared::error::AppError;
use tally_shared::types::{AccountId, CompanyId, UserId};

use crate::audit::{self, AuditEvent};
use crate::entities::{accounts, journal_lines};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// A domain rule was violated.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An account referenced by posted lines cannot be deactivated while
    /// it still has active children.
    #[error("Account {0} still has active child accounts")]
    HasActiveChildren(AccountId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Registry(ref inner) => match inner {
                RegistryError::AccountNotFound(_) => Self::NotFound(err.to_string()),
                RegistryError::ParentCycle(_) | RegistryError::HierarchyTooDeep(_) => {
                    Self::InvariantViolation(err.to_string())
                }
                _ => Self::Validation(err.to_string()),
            },
            AccountError::HasActiveChildren(_) => Self::Validation(err.to_string()),
            AccountError::Database(inner) => super::map_db_err(&inner),
        }
    }
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Company the account belongs to.
    pub company_id: CompanyId,
    /// Account code, unique within the company.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account classification.
    pub account_type: registry::AccountType,
    /// Optional parent in the account tree.
    pub parent_id: Option<AccountId>,
    /// Acting user, recorded in the audit trail.
    pub created_by: UserId,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New name, if changing.
    pub name: Option<String>,
    /// New parent assignment, if changing. `Some(None)` detaches the
    /// account to the root level.
    pub parent_id: Option<Option<AccountId>>,
}

/// Account repository for chart-of-accounts CRUD.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account after validating its code and parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken, the parent is invalid, or
    /// the database operation fails.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let existing = self.load_company_accounts(input.company_id).await?;

        if existing.iter().any(|a| a.code == input.code) {
            return Err(RegistryError::DuplicateCode(input.code).into());
        }

        let id = AccountId::new();
        if let Some(parent_id) = input.parent_id {
            registry::validate_parent(&existing, id, input.company_id, parent_id)?;
        }

        let now = Utc::now().into();
        let txn = self.db.begin().await?;

        let account = accounts::ActiveModel {
            id: Set(id.into_inner()),
            company_id: Set(input.company_id.into_inner()),
            code: Set(input.code.clone()),
            name: Set(input.name.clone()),
            account_type: Set(input.account_type.into()),
            parent_id: Set(input.parent_id.map(AccountId::into_inner)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = account.insert(&txn).await?;

        audit::record(
            &txn,
            AuditEvent::info(
                input.company_id.into_inner(),
                Some(input.created_by.into_inner()),
                "create",
                "accounts",
                model.id,
            )
            .with_new_values(serde_json::json!({
                "code": model.code,
                "name": model.name,
                "account_type": model.account_type,
                "parent_id": model.parent_id,
            })),
        )
        .await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Returns the account forest for a company, children ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_tree(&self, company_id: CompanyId) -> Result<Vec<AccountNode>, AccountError> {
        let accounts = self.load_company_accounts(company_id).await?;
        Ok(registry::build_forest(accounts))
    }

    /// Updates an account's name and/or parent.
    ///
    /// Re-parenting re-runs the full cycle check against the company's
    /// current tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing, the new parent is
    /// invalid, or the database operation fails.
    pub async fn update_account(
        &self,
        account_id: AccountId,
        input: UpdateAccountInput,
        updated_by: UserId,
    ) -> Result<accounts::Model, AccountError> {
        let model = self.find_account(account_id).await?;
        let company_id = CompanyId::from_uuid(model.company_id);

        if let Some(Some(new_parent)) = input.parent_id {
            let existing = self.load_company_accounts(company_id).await?;
            registry::validate_parent(&existing, account_id, company_id, new_parent)?;
        }

        let old_values = serde_json::json!({
            "name": model.name,
            "parent_id": model.parent_id,
        });

        let txn = self.db.begin().await?;

        let mut active: accounts::ActiveModel = model.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(parent) = input.parent_id {
            active.parent_id = Set(parent.map(AccountId::into_inner));
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        audit::record(
            &txn,
            AuditEvent::info(
                updated.company_id,
                Some(updated_by.into_inner()),
                "update",
                "accounts",
                updated.id,
            )
            .with_old_values(old_values)
            .with_new_values(serde_json::json!({
                "name": updated.name,
                "parent_id": updated.parent_id,
            })),
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Soft-deactivates an account.
    ///
    /// Accounts referenced by posted lines are never hard-deleted; an
    /// account with active children must have them detached or
    /// deactivated first.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing, still has active
    /// children, or the database operation fails.
    pub async fn deactivate_account(
        &self,
        account_id: AccountId,
        deactivated_by: UserId,
    ) -> Result<accounts::Model, AccountError> {
        let model = self.find_account(account_id).await?;

        let active_children = accounts::Entity::find()
            .filter(accounts::Column::ParentId.eq(account_id.into_inner()))
            .filter(accounts::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;
        if active_children > 0 {
            return Err(AccountError::HasActiveChildren(account_id));
        }

        let txn = self.db.begin().await?;

        let mut active: accounts::ActiveModel = model.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        audit::record(
            &txn,
            AuditEvent::info(
                updated.company_id,
                Some(deactivated_by.into_inner()),
                "deactivate",
                "accounts",
                updated.id,
            ),
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Returns the ids of an account and all of its descendants.
    ///
    /// Used by callers computing rolled-up balances over posted lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the database
    /// operation fails.
    pub async fn subtree_ids(&self, account_id: AccountId) -> Result<Vec<AccountId>, AccountError> {
        let model = self.find_account(account_id).await?;
        let accounts = self
            .load_company_accounts(CompanyId::from_uuid(model.company_id))
            .await?;
        Ok(registry::collect_descendants(&accounts, account_id))
    }

    /// Derives an account's balance by summing its posted journal lines.
    ///
    /// With `roll_up` the sum covers the account's whole subtree. Each
    /// line is signed by its own account's normal side, so a
    /// credit-normal contra account inside an asset subtree reduces the
    /// rolled-up total. Balances are never stored, which keeps this
    /// consistent with the journal by construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the database
    /// operation fails.
    pub async fn account_balance(
        &self,
        account_id: AccountId,
        roll_up: bool,
    ) -> Result<Decimal, AccountError> {
        let model = self.find_account(account_id).await?;
        let accounts = self
            .load_company_accounts(CompanyId::from_uuid(model.company_id))
            .await?;

        let ids = if roll_up {
            registry::collect_descendants(&accounts, account_id)
        } else {
            vec![account_id]
        };
        let types: HashMap<AccountId, registry::AccountType> =
            accounts.iter().map(|a| (a.id, a.account_type)).collect();

        let lines = journal_lines::Entity::find()
            .filter(
                journal_lines::Column::AccountId
                    .is_in(ids.iter().copied().map(AccountId::into_inner)),
            )
            .all(&self.db)
            .await?;

        let mut balance = Decimal::ZERO;
        for line in &lines {
            if let Some(account_type) = types.get(&AccountId::from_uuid(line.account_id)) {
                balance += account_type.balance_change(line.debit, line.credit);
            }
        }
        Ok(balance)
    }

    /// Returns true if the account is referenced by any posted line.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn has_posted_lines(&self, account_id: AccountId) -> Result<bool, AccountError> {
        let count = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(account_id.into_inner()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_account(&self, account_id: AccountId) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RegistryError::AccountNotFound(account_id).into())
    }

    /// Loads all of a company's accounts as flat domain rows.
    async fn load_company_accounts(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<Account>, AccountError> {
        let rows = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id.into_inner()))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(to_domain).collect())
    }
}

/// Maps a database row to the core domain type.
pub(crate) fn to_domain(model: accounts::Model) -> Account {
    Account {
        id: AccountId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        code: model.code,
        name: model.name,
        account_type: model.account_type.into(),
        parent_id: model.parent_id.map(AccountId::from_uuid),
        is_active: model.is_active,
    }
}
