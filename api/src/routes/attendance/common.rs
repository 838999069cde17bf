use db::models::attendance_record::Status;
use serde::{Deserialize, Serialize};
use services::gateway::{AttendanceRecord, AttendanceSession};
use services::geofence::Coordinate;

/// Public view of a session. Omits the OTP and QR payload, which only the
/// issuing faculty sees.
#[derive(Debug, Serialize)]
pub struct AttendanceSessionResponse {
    pub id: String,
    pub subject_id: String,
    pub subject_name: String,
    pub department: String,
    pub faculty_id: String,
    pub start_time: String,
    pub end_time: String,
    pub active: bool,
}

impl From<AttendanceSession> for AttendanceSessionResponse {
    fn from(m: AttendanceSession) -> Self {
        Self {
            id: m.id,
            subject_id: m.subject_id,
            subject_name: m.subject_name,
            department: m.department,
            faculty_id: m.faculty_id,
            start_time: m.start_time.to_rfc3339(),
            end_time: m.end_time.to_rfc3339(),
            active: m.active,
        }
    }
}

/// What the faculty gets back from opening a session.
#[derive(Debug, Serialize)]
pub struct IssuedSessionResponse {
    #[serde(flatten)]
    pub session: AttendanceSessionResponse,
    pub otp: String,
    pub qr_payload: String,
}

impl From<AttendanceSession> for IssuedSessionResponse {
    fn from(mut m: AttendanceSession) -> Self {
        let otp = std::mem::take(&mut m.otp);
        let qr_payload = std::mem::take(&mut m.qr_payload);
        Self {
            session: m.into(),
            otp,
            qr_payload,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttendanceRecordResponse {
    pub id: String,
    pub session_id: String,
    pub participant_id: String,
    pub participant_name: String,
    pub timestamp: String,
    pub status: Status,
    pub location_verified: bool,
    pub otp_verified: bool,
    pub qr_verified: bool,
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(m: AttendanceRecord) -> Self {
        Self {
            id: m.id,
            session_id: m.session_id,
            participant_id: m.participant_id,
            participant_name: m.participant_name,
            timestamp: m.timestamp.to_rfc3339(),
            status: m.status,
            location_verified: m.location_verified,
            otp_verified: m.otp_verified,
            qr_verified: m.qr_verified,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenSessionReq {
    pub subject_id: String,
    pub department: String,
    pub faculty_id: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceReq {
    pub participant_id: String,
    pub participant_name: String,
    pub otp: String,
    #[serde(default)]
    pub qr_match: bool,
    #[serde(default)]
    pub geo_verified: bool,
    pub position: Option<Coordinate>,
    pub scanned_payload: Option<String>,
}
