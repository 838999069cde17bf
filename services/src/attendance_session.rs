use crate::error::AttendanceError;
use crate::gateway::{AttendanceSession, GatewayError, PersistenceGateway};
use crate::token;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct OpenSession {
    pub subject_id: String,
    pub department: String,
    pub faculty_id: String,
    pub duration_minutes: i64,
}

/// Issues and retires attendance sessions. At most one session is active
/// system-wide; opening a new one retires the previous one in the same
/// store operation.
#[derive(Clone)]
pub struct SessionIssuer {
    gateway: Arc<dyn PersistenceGateway>,
}

impl SessionIssuer {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    pub async fn open_session(
        &self,
        params: OpenSession,
    ) -> Result<AttendanceSession, AttendanceError> {
        self.open_session_at(params, Utc::now()).await
    }

    /// Opens a session starting at `now`. The returned session is already
    /// visible to [`SessionIssuer::active_session`].
    pub async fn open_session_at(
        &self,
        params: OpenSession,
        now: DateTime<Utc>,
    ) -> Result<AttendanceSession, AttendanceError> {
        let OpenSession {
            subject_id,
            department,
            faculty_id,
            duration_minutes,
        } = params;

        if duration_minutes <= 0 {
            return Err(AttendanceError::InvalidDuration(duration_minutes));
        }
        let end_time = TimeDelta::try_minutes(duration_minutes)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or(AttendanceError::InvalidDuration(duration_minutes))?;

        let subject = self
            .gateway
            .find_subject(&subject_id)
            .await?
            .ok_or_else(|| AttendanceError::UnknownSubject(subject_id.clone()))?;
        if !self.gateway.department_exists(&department).await? {
            return Err(AttendanceError::UnknownDepartment(department));
        }

        let id = token::new_session_id();
        let otp = token::generate_otp();
        let qr_payload = token::qr_payload(&id, &otp);

        let session = AttendanceSession {
            id,
            subject_id: subject.id,
            subject_name: subject.name,
            department,
            faculty_id,
            start_time: now,
            end_time,
            otp,
            qr_payload,
            active: true,
        };

        match self.gateway.replace_active_session(session.clone()).await {
            Ok(()) => {}
            Err(GatewayError::Duplicate) => {
                tracing::warn!(subject_id = %session.subject_id, "Concurrent session open lost the race");
                return Err(AttendanceError::SessionConflict);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist new attendance session");
                return Err(e.into());
            }
        }

        tracing::info!(
            session_id = %session.id,
            subject_id = %session.subject_id,
            faculty_id = %session.faculty_id,
            end_time = %session.end_time,
            backend = ?self.gateway.backend(),
            "Opened attendance session"
        );
        Ok(session)
    }

    /// Closing an inactive or unknown session is a no-op.
    pub async fn close_session(&self, session_id: &str) -> Result<(), AttendanceError> {
        if self.gateway.close_session(session_id).await? {
            tracing::info!(session_id, "Closed attendance session");
        } else {
            tracing::debug!(session_id, "Close requested for a session that is not active");
        }
        Ok(())
    }

    pub async fn active_session(&self) -> Result<Option<AttendanceSession>, AttendanceError> {
        Ok(self.gateway.get_active_session().await?)
    }

    pub async fn find_session(
        &self,
        session_id: &str,
    ) -> Result<Option<AttendanceSession>, AttendanceError> {
        Ok(self.gateway.find_session(session_id).await?)
    }
}
