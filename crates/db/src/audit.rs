//! Audit trail writer.
//!
//! Every successful mutation records an audit row in the same database
//! transaction as the mutation itself, so the trail can never miss a
//! committed change. Period unlocks are recorded at critical severity,
//! asset disposals at warning, everything else at info.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};
use uuid::Uuid;

use crate::entities::{audit_log, sea_orm_active_enums::AuditSeverity};

/// A pending audit record.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub company_id: Uuid,
    pub user_id: Option<Uuid>,
    /// Verb such as `create`, `update`, `lock`, `unlock`, `depreciate`.
    pub action: String,
    pub table_name: String,
    pub record_id: Uuid,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub severity: AuditSeverity,
}

impl AuditEvent {
    /// An info-severity event with no value snapshots.
    #[must_use]
    pub fn info(
        company_id: Uuid,
        user_id: Option<Uuid>,
        action: &str,
        table_name: &str,
        record_id: Uuid,
    ) -> Self {
        Self {
            company_id,
            user_id,
            action: action.to_string(),
            table_name: table_name.to_string(),
            record_id,
            old_values: None,
            new_values: None,
            severity: AuditSeverity::Info,
        }
    }

    /// Attaches the new-state snapshot.
    #[must_use]
    pub fn with_new_values(mut self, values: serde_json::Value) -> Self {
        self.new_values = Some(values);
        self
    }

    /// Attaches the old-state snapshot.
    #[must_use]
    pub fn with_old_values(mut self, values: serde_json::Value) -> Self {
        self.old_values = Some(values);
        self
    }

    /// Escalates to warning severity.
    #[must_use]
    pub fn warning(mut self) -> Self {
        self.severity = AuditSeverity::Warning;
        self
    }

    /// Escalates to critical severity.
    #[must_use]
    pub fn critical(mut self) -> Self {
        self.severity = AuditSeverity::Critical;
        self
    }
}

/// Writes an audit record on the given connection or transaction.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn record<C: ConnectionTrait>(conn: &C, event: AuditEvent) -> Result<(), DbErr> {
    let row = audit_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        company_id: Set(event.company_id),
        user_id: Set(event.user_id),
        action: Set(event.action),
        table_name: Set(event.table_name),
        record_id: Set(event.record_id),
        old_values: Set(event.old_values),
        new_values: Set(event.new_values),
        severity: Set(event.severity),
        created_at: Set(Utc::now().into()),
    };
    row.insert(conn).await?;
    Ok(())
}
