//! PostgreSQL-backed `AuditLog` implementation using Diesel ORM.
//!
//! Appends one `activity_log` row per record. Callers treat failures as
//! best-effort (see the domain's `record_best_effort`), so this adapter only
//! reports them.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::audit::AuditRecord;
use crate::domain::ports::{AuditLog, AuditLogError};

use super::models::NewActivityRow;
use super::pool::{DbPool, PoolError};
use super::schema::activity_log;

/// Diesel-backed implementation of the audit log port.
#[derive(Clone)]
pub struct DieselAuditLog {
    pool: DbPool,
}

impl DieselAuditLog {
    /// Create a new audit log with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AuditLogError {
    AuditLogError::write(error.to_string())
}

#[async_trait]
impl AuditLog for DieselAuditLog {
    async fn record(&self, record: AuditRecord) -> Result<(), AuditLogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewActivityRow {
            id: Uuid::new_v4(),
            actor_id: *record.actor.as_uuid(),
            action: record.action.as_str(),
            target_user_id: record.target_user.map(|user| *user.as_uuid()),
            target_swap_id: record.target_swap,
            details: &record.details,
        };

        diesel::insert_into(activity_log::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| AuditLogError::write(err.to_string()))
    }
}
