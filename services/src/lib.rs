//! Attendance-session verification and integrity core.
//!
//! - [`geofence`]: campus membership from raw coordinates.
//! - [`attendance_session`]: opening and closing the single active session.
//! - [`attendance_record`]: the authoritative check-in commit.
//! - [`gateway`]: the persistence boundary, remote or local.

pub mod attendance_record;
pub mod attendance_session;
pub mod error;
pub mod gateway;
pub mod geofence;
pub mod operating_window;
pub mod token;

pub use attendance_record::{AttendanceRecorder, MarkAttendance};
pub use attendance_session::{OpenSession, SessionIssuer};
pub use error::{AttendanceError, Disposition};
pub use gateway::{Backend, GatewayError, PersistenceGateway};
