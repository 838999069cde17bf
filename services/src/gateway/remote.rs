use super::{AttendanceRecord, AttendanceSession, Backend, GatewayError, PersistenceGateway};
use async_trait::async_trait;
use db::models::{department, subject};
use db::repositories::{
    AttendanceRecordRepository, AttendanceSessionRepository, RegistryRepository,
};
use sea_orm::DatabaseConnection;
use std::time::Duration;

/// Gateway over any `sea-orm` connection. Uniqueness is enforced by the
/// schema's indexes, so concurrent writers cannot both win.
#[derive(Clone)]
pub struct SeaOrmGateway {
    db: DatabaseConnection,
}

impl SeaOrmGateway {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects and pings; the schema is expected to be migrated already.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let db = db::connect(url, timeout).await?;
        db.ping().await?;
        Ok(Self::new(db))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl PersistenceGateway for SeaOrmGateway {
    fn backend(&self) -> Backend {
        Backend::Remote
    }

    async fn get_active_session(&self) -> Result<Option<AttendanceSession>, GatewayError> {
        Ok(AttendanceSessionRepository::find_active(&self.db).await?)
    }

    async fn find_session(&self, id: &str) -> Result<Option<AttendanceSession>, GatewayError> {
        Ok(AttendanceSessionRepository::find_by_id(&self.db, id).await?)
    }

    async fn insert_session(&self, session: AttendanceSession) -> Result<(), GatewayError> {
        AttendanceSessionRepository::insert(&self.db, session).await?;
        Ok(())
    }

    async fn deactivate_active_sessions(&self) -> Result<u64, GatewayError> {
        Ok(AttendanceSessionRepository::deactivate_all(&self.db).await?)
    }

    async fn replace_active_session(&self, session: AttendanceSession) -> Result<(), GatewayError> {
        AttendanceSessionRepository::replace_active(&self.db, session).await?;
        Ok(())
    }

    async fn close_session(&self, id: &str) -> Result<bool, GatewayError> {
        Ok(AttendanceSessionRepository::deactivate(&self.db, id).await?)
    }

    async fn insert_record(&self, record: AttendanceRecord) -> Result<(), GatewayError> {
        AttendanceRecordRepository::insert(&self.db, record).await?;
        Ok(())
    }

    async fn query_records(&self, session_id: &str) -> Result<Vec<AttendanceRecord>, GatewayError> {
        Ok(AttendanceRecordRepository::for_session(&self.db, session_id).await?)
    }

    async fn query_history(
        &self,
        participant_id: &str,
    ) -> Result<Vec<AttendanceRecord>, GatewayError> {
        Ok(AttendanceRecordRepository::for_participant(&self.db, participant_id).await?)
    }

    async fn find_subject(&self, id: &str) -> Result<Option<subject::Model>, GatewayError> {
        Ok(RegistryRepository::find_subject(&self.db, id).await?)
    }

    async fn department_exists(&self, name: &str) -> Result<bool, GatewayError> {
        Ok(RegistryRepository::department_exists(&self.db, name).await?)
    }

    async fn list_subjects(&self) -> Result<Vec<subject::Model>, GatewayError> {
        Ok(RegistryRepository::subjects(&self.db).await?)
    }

    async fn list_departments(&self) -> Result<Vec<department::Model>, GatewayError> {
        Ok(RegistryRepository::departments(&self.db).await?)
    }
}
