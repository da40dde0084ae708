//! `SeaORM` entity definitions for the ledger schema.

pub mod accounts;
pub mod audit_log;
pub mod companies;
pub mod entry_counters;
pub mod fixed_assets;
pub mod journal_entries;
pub mod journal_lines;
pub mod period_locks;
pub mod sea_orm_active_enums;
pub mod users;
