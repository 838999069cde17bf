//! Persistence boundary of the attendance core.
//!
//! [`PersistenceGateway`] has two interchangeable implementations: the
//! database-backed [`SeaOrmGateway`] and the in-process [`LocalGateway`].
//! [`connect_gateway`] probes the remote once at startup and picks one, so
//! reachability is never checked anywhere else.

mod local;
mod remote;

pub use local::LocalGateway;
pub use remote::SeaOrmGateway;

use async_trait::async_trait;
use db::models::{attendance_record, attendance_session, department, subject};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::{path::PathBuf, sync::Arc, time::Duration};

pub type AttendanceSession = attendance_session::Model;
pub type AttendanceRecord = attendance_record::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Remote,
    Local,
}

/// "Not found" is `Ok(None)` or an empty list, never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("uniqueness constraint violated")]
    Duplicate,

    #[error("write rejected: {0}")]
    Rejected(String),
}

impl From<DbErr> for GatewayError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
            return GatewayError::Duplicate;
        }
        match err {
            DbErr::Conn(e) => GatewayError::Unreachable(e.to_string()),
            DbErr::ConnectionAcquire(e) => GatewayError::Unreachable(e.to_string()),
            other => GatewayError::Rejected(other.to_string()),
        }
    }
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    fn backend(&self) -> Backend;

    async fn get_active_session(&self) -> Result<Option<AttendanceSession>, GatewayError>;

    async fn find_session(&self, id: &str) -> Result<Option<AttendanceSession>, GatewayError>;

    /// Fails with [`GatewayError::Duplicate`] on a reused id or on a second
    /// active row.
    async fn insert_session(&self, session: AttendanceSession) -> Result<(), GatewayError>;

    async fn deactivate_active_sessions(&self) -> Result<u64, GatewayError>;

    /// Deactivate-all then insert as one unit; readers never see two active
    /// sessions.
    async fn replace_active_session(&self, session: AttendanceSession) -> Result<(), GatewayError>;

    /// Returns whether an active session was actually closed.
    async fn close_session(&self, id: &str) -> Result<bool, GatewayError>;

    /// Fails with [`GatewayError::Duplicate`] when `(session_id,
    /// participant_id)` already has a record.
    async fn insert_record(&self, record: AttendanceRecord) -> Result<(), GatewayError>;

    async fn query_records(&self, session_id: &str) -> Result<Vec<AttendanceRecord>, GatewayError>;

    async fn query_history(
        &self,
        participant_id: &str,
    ) -> Result<Vec<AttendanceRecord>, GatewayError>;

    async fn find_subject(&self, id: &str) -> Result<Option<subject::Model>, GatewayError>;

    async fn department_exists(&self, name: &str) -> Result<bool, GatewayError>;

    async fn list_subjects(&self) -> Result<Vec<subject::Model>, GatewayError>;

    async fn list_departments(&self) -> Result<Vec<department::Model>, GatewayError>;
}

/// Picks the remote store when `database_url` is set and answers a ping
/// within `timeout`; otherwise the local store at `local_store` (or a purely
/// in-memory one).
pub async fn connect_gateway(
    database_url: &str,
    timeout: Duration,
    local_store: Option<PathBuf>,
) -> Arc<dyn PersistenceGateway> {
    if database_url.trim().is_empty() {
        tracing::info!("No DATABASE_URL configured, using local store");
    } else {
        match tokio::time::timeout(timeout, SeaOrmGateway::connect(database_url, timeout)).await {
            Ok(Ok(gateway)) => {
                tracing::info!("Remote store reachable");
                return Arc::new(gateway);
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Remote store unavailable, falling back to local store");
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "Remote store probe timed out, falling back to local store"
                );
            }
        }
    }

    Arc::new(LocalGateway::open(local_store).await)
}
