use crate::error::AttendanceError;
use crate::gateway::{AttendanceRecord, AttendanceSession, GatewayError, PersistenceGateway};
use crate::geofence::{CampusLocation, Coordinate};
use crate::operating_window::OperatingWindow;
use crate::token;
use chrono::{DateTime, Local, TimeZone, Utc};
use db::models::attendance_record::Status;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One participant's verification bundle.
///
/// `qr_match` and `geo_verified` are what the client claims. When the raw
/// evidence (`scanned_payload`, `position`) is present it is re-checked here
/// and the claim is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkAttendance {
    pub session_id: String,
    pub participant_id: String,
    pub participant_name: String,
    pub submitted_otp: String,
    #[serde(default)]
    pub qr_match: bool,
    #[serde(default)]
    pub geo_verified: bool,
    #[serde(default)]
    pub position: Option<Coordinate>,
    #[serde(default)]
    pub scanned_payload: Option<String>,
}

/// Observable check-in state of a `(session, participant)` pair. Rejections
/// that allow a retry leave the pair in `NotAttempted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckInState {
    NotAttempted,
    Committed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    pub participant_id: String,
    pub sessions_attended: usize,
    pub present: usize,
    pub late: usize,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl ParticipantSummary {
    fn from_history(participant_id: &str, history: &[AttendanceRecord]) -> Self {
        let count = |status: Status| history.iter().filter(|r| r.status == status).count();
        Self {
            participant_id: participant_id.to_owned(),
            sessions_attended: history.len(),
            present: count(Status::Present),
            late: count(Status::Late),
            first_seen: history.iter().map(|r| r.timestamp).min(),
            last_seen: history.iter().map(|r| r.timestamp).max(),
        }
    }
}

/// The authoritative check-in commit.
#[derive(Clone)]
pub struct AttendanceRecorder {
    gateway: Arc<dyn PersistenceGateway>,
    campus: CampusLocation,
    window: OperatingWindow,
}

impl AttendanceRecorder {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        campus: CampusLocation,
        window: OperatingWindow,
    ) -> Self {
        Self {
            gateway,
            campus,
            window,
        }
    }

    pub fn campus(&self) -> &CampusLocation {
        &self.campus
    }

    pub fn window(&self) -> OperatingWindow {
        self.window
    }

    /// Verifies `params` against the active session at `current_time` and
    /// commits one PRESENT record. The daily window is read off the host's
    /// local wall clock.
    pub async fn mark_present(
        &self,
        params: MarkAttendance,
        current_time: DateTime<Utc>,
    ) -> Result<AttendanceRecord, AttendanceError> {
        self.mark_present_at_local(params, current_time.with_timezone(&Local))
            .await
    }

    /// Like [`AttendanceRecorder::mark_present`], with the wall clock given
    /// explicitly. The window sees `local_time` as-is; session bounds see the
    /// instant it denotes.
    ///
    /// The duplicate check is the store's uniqueness constraint, so it only
    /// fires once every other predicate has passed, and two racing
    /// submissions for the same pair cannot both commit.
    pub async fn mark_present_at_local<Tz: TimeZone>(
        &self,
        params: MarkAttendance,
        local_time: DateTime<Tz>,
    ) -> Result<AttendanceRecord, AttendanceError> {
        if !self.window.permits(&local_time) {
            return Err(AttendanceError::OutsideOperatingWindow);
        }
        let current_time = local_time.with_timezone(&Utc);

        let session = self
            .gateway
            .get_active_session()
            .await?
            .filter(|s| s.id == params.session_id && s.covers(current_time))
            .ok_or(AttendanceError::SessionExpired)?;

        if !self.location_ok(&params)? {
            return Err(AttendanceError::OutOfBounds);
        }
        if !qr_ok(&params, &session) {
            return Err(AttendanceError::OpticalMismatch);
        }
        if !token::otp_matches(&session.otp, &params.submitted_otp) {
            return Err(AttendanceError::InvalidToken);
        }

        let record = AttendanceRecord {
            id: token::new_record_id(),
            session_id: session.id,
            participant_id: params.participant_id,
            participant_name: params.participant_name,
            timestamp: current_time,
            status: Status::Present,
            location_verified: true,
            otp_verified: true,
            qr_verified: true,
        };

        match self.gateway.insert_record(record.clone()).await {
            Ok(()) => {
                tracing::info!(
                    session_id = %record.session_id,
                    participant_id = %record.participant_id,
                    "Attendance committed"
                );
                Ok(record)
            }
            Err(GatewayError::Duplicate) => {
                tracing::debug!(
                    session_id = %record.session_id,
                    participant_id = %record.participant_id,
                    "Duplicate check-in rejected"
                );
                Err(AttendanceError::DuplicateSubmission)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist attendance record");
                Err(e.into())
            }
        }
    }

    fn location_ok(&self, params: &MarkAttendance) -> Result<bool, AttendanceError> {
        match params.position {
            Some(position) => Ok(self.campus.contains(position.validated()?)),
            None => Ok(params.geo_verified),
        }
    }

    /// Records for `session_id`, oldest first.
    pub async fn list_records(
        &self,
        session_id: &str,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        Ok(self.gateway.query_records(session_id).await?)
    }

    /// Every record of `participant_id` across sessions, oldest first.
    pub async fn list_history(
        &self,
        participant_id: &str,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        Ok(self.gateway.query_history(participant_id).await?)
    }

    pub async fn check_in_state(
        &self,
        session_id: &str,
        participant_id: &str,
    ) -> Result<CheckInState, AttendanceError> {
        let committed = self
            .gateway
            .query_records(session_id)
            .await?
            .iter()
            .any(|r| r.participant_id == participant_id);
        Ok(if committed {
            CheckInState::Committed
        } else {
            CheckInState::NotAttempted
        })
    }

    pub async fn participant_summary(
        &self,
        participant_id: &str,
    ) -> Result<ParticipantSummary, AttendanceError> {
        let history = self.list_history(participant_id).await?;
        Ok(ParticipantSummary::from_history(participant_id, &history))
    }
}

fn qr_ok(params: &MarkAttendance, session: &AttendanceSession) -> bool {
    match &params.scanned_payload {
        Some(scanned) => scanned == &session.qr_payload,
        None => params.qr_match,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::LocalGateway;
    use chrono::{FixedOffset, TimeDelta};

    const CAMPUS: CampusLocation = CampusLocation {
        latitude: 11.0827,
        longitude: 77.0003,
        radius_meters: 800.0,
    };

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
    }

    async fn recorder_with_session() -> (AttendanceRecorder, AttendanceSession) {
        let gateway = Arc::new(LocalGateway::in_memory());
        let session = AttendanceSession {
            id: "sess-1".into(),
            subject_id: "CS801".into(),
            subject_name: "Distributed Systems".into(),
            department: "Computer Science".into(),
            faculty_id: "F001".into(),
            start_time: t0(),
            end_time: t0() + TimeDelta::minutes(15),
            otp: "482913".into(),
            qr_payload: token::qr_payload("sess-1", "482913"),
            active: true,
        };
        gateway.insert_session(session.clone()).await.unwrap();
        let recorder = AttendanceRecorder::new(gateway, CAMPUS, OperatingWindow::ALWAYS);
        (recorder, session)
    }

    fn bundle(otp: &str) -> MarkAttendance {
        MarkAttendance {
            session_id: "sess-1".into(),
            participant_id: "S101".into(),
            participant_name: "Arun Kumar".into(),
            submitted_otp: otp.into(),
            qr_match: true,
            geo_verified: true,
            position: None,
            scanned_payload: None,
        }
    }

    #[tokio::test]
    async fn bad_predicates_are_retryable_and_leave_no_record() {
        let (recorder, _) = recorder_with_session().await;
        let at = t0() + TimeDelta::minutes(5);

        let mut p = bundle("482913");
        p.geo_verified = false;
        assert_eq!(recorder.mark_present(p, at).await, Err(AttendanceError::OutOfBounds));

        let mut p = bundle("482913");
        p.qr_match = false;
        assert_eq!(recorder.mark_present(p, at).await, Err(AttendanceError::OpticalMismatch));

        for otp in ["4829130", "482914", " 482913", ""] {
            let err = recorder.mark_present(bundle(otp), at).await.unwrap_err();
            assert_eq!(err, AttendanceError::InvalidToken);
            assert!(err.is_retryable());
        }

        assert!(recorder.list_records("sess-1").await.unwrap().is_empty());
        assert_eq!(
            recorder.check_in_state("sess-1", "S101").await.unwrap(),
            CheckInState::NotAttempted
        );

        recorder.mark_present(bundle("482913"), at).await.unwrap();
        assert_eq!(
            recorder.check_in_state("sess-1", "S101").await.unwrap(),
            CheckInState::Committed
        );
    }

    #[tokio::test]
    async fn stale_otp_on_a_marked_participant_is_not_a_duplicate() {
        let (recorder, _) = recorder_with_session().await;
        let at = t0() + TimeDelta::minutes(5);
        recorder.mark_present(bundle("482913"), at).await.unwrap();

        assert_eq!(
            recorder.mark_present(bundle("111111"), at).await,
            Err(AttendanceError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn raw_position_overrides_the_claim() {
        let (recorder, _) = recorder_with_session().await;
        let at = t0() + TimeDelta::minutes(1);

        let mut p = bundle("482913");
        p.geo_verified = true;
        p.position = Some(Coordinate {
            latitude: 13.0827,
            longitude: 80.2707,
        });
        assert_eq!(recorder.mark_present(p, at).await, Err(AttendanceError::OutOfBounds));

        let mut p = bundle("482913");
        p.position = Some(Coordinate {
            latitude: 95.0,
            longitude: 0.0,
        });
        assert!(matches!(
            recorder.mark_present(p, at).await,
            Err(AttendanceError::InvalidCoordinate { .. })
        ));

        let mut p = bundle("482913");
        p.geo_verified = false;
        p.position = Some(Coordinate {
            latitude: 11.0830,
            longitude: 77.0010,
        });
        let record = recorder.mark_present(p, at).await.unwrap();
        assert!(record.location_verified);
    }

    #[tokio::test]
    async fn scanned_payload_overrides_the_claim() {
        let (recorder, session) = recorder_with_session().await;
        let at = t0() + TimeDelta::minutes(1);

        let mut p = bundle("482913");
        p.scanned_payload = Some(token::qr_payload("other-session", "482913"));
        assert_eq!(recorder.mark_present(p, at).await, Err(AttendanceError::OpticalMismatch));

        let mut p = bundle("482913");
        p.qr_match = false;
        p.scanned_payload = Some(session.qr_payload.clone());
        assert!(recorder.mark_present(p, at).await.is_ok());
    }

    #[tokio::test]
    async fn session_bounds_are_inclusive() {
        let (recorder, _) = recorder_with_session().await;
        recorder.mark_present(bundle("482913"), t0()).await.unwrap();

        let mut p = bundle("482913");
        p.participant_id = "S102".into();
        recorder
            .mark_present(p, t0() + TimeDelta::minutes(15))
            .await
            .unwrap();

        let mut p = bundle("482913");
        p.participant_id = "S103".into();
        assert_eq!(
            recorder.mark_present(p, t0() - TimeDelta::seconds(1)).await,
            Err(AttendanceError::SessionExpired)
        );
    }

    #[tokio::test]
    async fn wrong_session_id_is_expired() {
        let (recorder, _) = recorder_with_session().await;
        let mut p = bundle("482913");
        p.session_id = "sess-0".into();
        let err = recorder
            .mark_present(p, t0() + TimeDelta::minutes(1))
            .await
            .unwrap_err();
        assert_eq!(err, AttendanceError::SessionExpired);
        assert!(!err.is_retryable());
    }

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    #[tokio::test]
    async fn operating_window_gates_every_attempt() {
        let gateway = Arc::new(LocalGateway::in_memory());
        let recorder = AttendanceRecorder::new(gateway, CAMPUS, OperatingWindow::new(8 * 60, 17 * 60));
        let evening = ist().with_ymd_and_hms(2026, 1, 5, 18, 0, 0).unwrap();
        assert_eq!(
            recorder.mark_present_at_local(bundle("482913"), evening).await,
            Err(AttendanceError::OutsideOperatingWindow)
        );
    }

    #[tokio::test]
    async fn operating_window_reads_the_local_wall_clock() {
        let gateway = Arc::new(LocalGateway::in_memory());
        // 10:00 at +05:30 is 04:30 UTC, before an 08:00 opening in UTC terms.
        let local_ten = ist().with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap();
        let start = local_ten.with_timezone(&Utc) - TimeDelta::minutes(5);
        let session = AttendanceSession {
            id: "sess-1".into(),
            subject_id: "CS801".into(),
            subject_name: "Distributed Systems".into(),
            department: "Computer Science".into(),
            faculty_id: "F001".into(),
            start_time: start,
            end_time: start + TimeDelta::minutes(15),
            otp: "482913".into(),
            qr_payload: token::qr_payload("sess-1", "482913"),
            active: true,
        };
        gateway.insert_session(session).await.unwrap();
        let recorder = AttendanceRecorder::new(gateway, CAMPUS, OperatingWindow::new(8 * 60, 17 * 60));

        let record = recorder
            .mark_present_at_local(bundle("482913"), local_ten)
            .await
            .unwrap();
        assert_eq!(record.timestamp, local_ten.with_timezone(&Utc));
    }

    #[tokio::test]
    async fn mark_present_uses_the_host_clock_for_the_window() {
        let gateway = Arc::new(LocalGateway::in_memory());
        let window = OperatingWindow::new(8 * 60, 17 * 60);
        let recorder = AttendanceRecorder::new(gateway, CAMPUS, window);
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 3, 0, 0).unwrap();

        let result = recorder.mark_present(bundle("482913"), at).await;
        if window.permits(&at.with_timezone(&Local)) {
            // No session is open, so the next gate rejects.
            assert_eq!(result, Err(AttendanceError::SessionExpired));
        } else {
            assert_eq!(result, Err(AttendanceError::OutsideOperatingWindow));
        }
    }

    #[tokio::test]
    async fn summary_counts_history() {
        let (recorder, _) = recorder_with_session().await;
        let empty = recorder.participant_summary("S101").await.unwrap();
        assert_eq!(empty.sessions_attended, 0);
        assert_eq!(empty.first_seen, None);

        let at = t0() + TimeDelta::minutes(3);
        recorder.mark_present(bundle("482913"), at).await.unwrap();
        let summary = recorder.participant_summary("S101").await.unwrap();
        assert_eq!(summary.sessions_attended, 1);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.late, 0);
        assert_eq!(summary.last_seen, Some(at));
    }
}
