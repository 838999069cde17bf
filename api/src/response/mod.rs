use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use services::AttendanceError;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }
}

/// `data` of a rejected attendance operation.
#[derive(Debug, Serialize)]
pub struct Rejection {
    pub code: &'static str,
    pub retryable: bool,
}

pub fn status_for(err: &AttendanceError) -> StatusCode {
    match err {
        AttendanceError::InvalidCoordinate { .. }
        | AttendanceError::OutOfBounds
        | AttendanceError::OpticalMismatch
        | AttendanceError::InvalidToken
        | AttendanceError::InvalidDuration(_) => StatusCode::BAD_REQUEST,
        AttendanceError::SessionExpired | AttendanceError::OutsideOperatingWindow => {
            StatusCode::GONE
        }
        AttendanceError::DuplicateSubmission | AttendanceError::SessionConflict => {
            StatusCode::CONFLICT
        }
        AttendanceError::UnknownSubject(_) | AttendanceError::UnknownDepartment(_) => {
            StatusCode::NOT_FOUND
        }
        AttendanceError::PersistenceFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Renders an [`AttendanceError`] as `(status, ApiResponse<Rejection>)`.
pub fn rejection(err: AttendanceError) -> Response {
    let body = ApiResponse {
        success: false,
        data: Rejection {
            code: err.code(),
            retryable: err.is_retryable(),
        },
        message: err.to_string(),
    };
    (status_for(&err), Json(body)).into_response()
}
