//! Ordered forest construction and parent-chain validation.
//!
//! The account hierarchy is stored flat (parent-by-id) and assembled into an
//! ordered forest on demand. Cycle detection is an explicit bounded upward
//! traversal over the flat rows rather than a database constraint.

use std::collections::HashMap;

use tally_shared::types::{AccountId, CompanyId};

use super::error::RegistryError;
use super::types::Account;

/// Maximum supported depth of the account hierarchy.
///
/// Deep enough for any realistic chart of accounts; shallow enough that a
/// corrupt parent chain is reported instead of looping.
pub const MAX_TREE_DEPTH: usize = 32;

/// A node in the account forest, children ordered by code.
#[derive(Debug, Clone)]
pub struct AccountNode {
    /// The account at this node.
    pub account: Account,
    /// Child nodes, sorted by account code.
    pub children: Vec<AccountNode>,
}

/// Builds the ordered account forest for one company from flat rows.
///
/// Roots and children are sorted by account code. Rows whose parent is
/// missing from the input are treated as roots, so a partial snapshot still
/// produces a usable forest.
#[must_use]
pub fn build_forest(accounts: Vec<Account>) -> Vec<AccountNode> {
    let known: HashMap<AccountId, ()> = accounts.iter().map(|a| (a.id, ())).collect();

    let mut by_parent: HashMap<Option<AccountId>, Vec<Account>> = HashMap::new();
    for account in accounts {
        let key = match account.parent_id {
            Some(parent) if known.contains_key(&parent) => Some(parent),
            _ => None,
        };
        by_parent.entry(key).or_default().push(account);
    }

    fn attach(
        parent: Option<AccountId>,
        by_parent: &mut HashMap<Option<AccountId>, Vec<Account>>,
        depth: usize,
    ) -> Vec<AccountNode> {
        if depth > MAX_TREE_DEPTH {
            return Vec::new();
        }
        let mut level = by_parent.remove(&parent).unwrap_or_default();
        level.sort_by(|a, b| a.code.cmp(&b.code));
        level
            .into_iter()
            .map(|account| {
                let children = attach(Some(account.id), by_parent, depth + 1);
                AccountNode { account, children }
            })
            .collect()
    }

    attach(None, &mut by_parent, 0)
}

/// Validates a parent assignment against the flat parent index.
///
/// Checks, in order: the parent exists, belongs to the same company, is not
/// the account itself, and is not a descendant of the account (which would
/// create a cycle). The upward traversal is bounded by [`MAX_TREE_DEPTH`].
///
/// `account_id` is the account being created or re-parented; for a brand-new
/// account it simply never appears on the parent chain.
///
/// # Errors
///
/// Returns a `RegistryError` describing the first violated rule.
pub fn validate_parent(
    accounts: &[Account],
    account_id: AccountId,
    account_company: CompanyId,
    parent_id: AccountId,
) -> Result<(), RegistryError> {
    let by_id: HashMap<AccountId, &Account> = accounts.iter().map(|a| (a.id, a)).collect();

    let parent = by_id
        .get(&parent_id)
        .ok_or(RegistryError::ParentNotFound(parent_id))?;

    if parent.company_id != account_company {
        return Err(RegistryError::ParentWrongCompany(parent_id));
    }

    if parent_id == account_id {
        return Err(RegistryError::ParentCycle(account_id));
    }

    // Walk upward from the proposed parent; reaching the account means the
    // parent sits below it and the assignment would close a loop.
    let mut cursor = parent.parent_id;
    let mut depth = 1usize;
    while let Some(ancestor) = cursor {
        if ancestor == account_id {
            return Err(RegistryError::ParentCycle(account_id));
        }
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            return Err(RegistryError::HierarchyTooDeep(MAX_TREE_DEPTH));
        }
        cursor = by_id.get(&ancestor).and_then(|a| a.parent_id);
    }

    Ok(())
}

/// Collects `account_id` and all of its descendants from flat rows.
///
/// Used for rolled-up balance queries.
#[must_use]
pub fn collect_descendants(accounts: &[Account], account_id: AccountId) -> Vec<AccountId> {
    let mut children_of: HashMap<AccountId, Vec<AccountId>> = HashMap::new();
    for account in accounts {
        if let Some(parent) = account.parent_id {
            children_of.entry(parent).or_default().push(account.id);
        }
    }

    let mut result = Vec::new();
    let mut stack = vec![account_id];
    while let Some(id) = stack.pop() {
        if result.contains(&id) {
            // Corrupt (cyclic) data; stop rather than loop.
            continue;
        }
        result.push(id);
        if let Some(children) = children_of.get(&id) {
            stack.extend(children.iter().copied());
        }
    }
    result
}
