//! Registry error types.

use tally_shared::types::AccountId;
use thiserror::Error;

/// Errors that can occur during chart-of-accounts operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Account code already exists within the company.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Parent account belongs to a different company.
    #[error("Parent account {0} belongs to a different company")]
    ParentWrongCompany(AccountId),

    /// Assigning the parent would create a cycle in the account tree.
    #[error("Parent assignment would create a cycle through account {0}")]
    ParentCycle(AccountId),

    /// Parent chain exceeds the maximum supported depth.
    #[error("Account hierarchy exceeds maximum depth of {0}")]
    HierarchyTooDeep(usize),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),
}
