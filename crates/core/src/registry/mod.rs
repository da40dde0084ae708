//! Chart of accounts registry.
//!
//! This module implements the account hierarchy:
//! - Account domain types and normal-side balance rules
//! - Ordered forest construction from flat parent-by-id rows
//! - Bounded upward-traversal parent/cycle validation
//! - Error types for registry operations

pub mod error;
pub mod tree;
pub mod types;

pub use error::RegistryError;
pub use tree::{AccountNode, build_forest, collect_descendants, validate_parent};
pub use types::{Account, AccountType};
