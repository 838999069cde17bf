use crate::gateway::GatewayError;
use serde::Serialize;

/// Whether a rejected attempt can succeed if the caller tries again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Fix the input (or wait out a transient store failure) and retry.
    Retry,
    /// The attempt is permanently void; only a new session can help.
    Void,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttendanceError {
    #[error("Invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Attendance session is not active or its time window has closed")]
    SessionExpired,

    #[error("Location is outside the campus geofence")]
    OutOfBounds,

    #[error("QR code does not match the active session")]
    OpticalMismatch,

    #[error("Invalid session OTP")]
    InvalidToken,

    #[error("Attendance already recorded for this session")]
    DuplicateSubmission,

    #[error("Another session was opened concurrently")]
    SessionConflict,

    #[error("Unknown subject '{0}'")]
    UnknownSubject(String),

    #[error("Unknown department '{0}'")]
    UnknownDepartment(String),

    #[error("Session duration must be a positive number of minutes, got {0}")]
    InvalidDuration(i64),

    #[error("Check-in is closed outside the daily operating window")]
    OutsideOperatingWindow,
}

impl AttendanceError {
    pub fn disposition(&self) -> Disposition {
        match self {
            AttendanceError::SessionExpired
            | AttendanceError::DuplicateSubmission
            | AttendanceError::OutsideOperatingWindow => Disposition::Void,
            _ => Disposition::Retry,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.disposition() == Disposition::Retry
    }

    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            AttendanceError::InvalidCoordinate { .. } => "INVALID_COORDINATE",
            AttendanceError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
            AttendanceError::SessionExpired => "SESSION_EXPIRED",
            AttendanceError::OutOfBounds => "OUT_OF_BOUNDS",
            AttendanceError::OpticalMismatch => "OPTICAL_MISMATCH",
            AttendanceError::InvalidToken => "INVALID_TOKEN",
            AttendanceError::DuplicateSubmission => "DUPLICATE_SUBMISSION",
            AttendanceError::SessionConflict => "SESSION_CONFLICT",
            AttendanceError::UnknownSubject(_) => "UNKNOWN_SUBJECT",
            AttendanceError::UnknownDepartment(_) => "UNKNOWN_DEPARTMENT",
            AttendanceError::InvalidDuration(_) => "INVALID_DURATION",
            AttendanceError::OutsideOperatingWindow => "OUTSIDE_OPERATING_WINDOW",
        }
    }
}

/// Store failures on read paths and non-unique writes. Uniqueness
/// violations are mapped by the caller, since their meaning depends on
/// which write hit them.
impl From<GatewayError> for AttendanceError {
    fn from(err: GatewayError) -> Self {
        AttendanceError::PersistenceFailure(err.to_string())
    }
}
