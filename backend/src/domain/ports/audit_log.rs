//! Port for the audit-log collaborator.
//!
//! Writes are best-effort: services call [`record_best_effort`] helpers that
//! log failures and never fail the parent operation.

use async_trait::async_trait;

use crate::domain::audit::AuditRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by audit log adapters.
    pub enum AuditLogError {
        /// The record could not be written.
        Write { message: String } =>
            "audit log write failed: {message}",
    }
}

/// Port for persisting audit records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Persist one audit record.
    async fn record(&self, record: AuditRecord) -> Result<(), AuditLogError>;
}

/// Write `record`, logging a warning instead of failing when the sink is
/// unavailable.
pub async fn record_best_effort<A>(audit: &A, record: AuditRecord)
where
    A: AuditLog + ?Sized,
{
    let action = record.action;
    if let Err(error) = audit.record(record).await {
        tracing::warn!(%error, action = action.as_str(), "audit log write failed");
    }
}

/// Fixture implementation that drops every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAuditLog;

#[async_trait]
impl AuditLog for NoOpAuditLog {
    async fn record(&self, _record: AuditRecord) -> Result<(), AuditLogError> {
        Ok(())
    }
}
