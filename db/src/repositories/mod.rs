pub mod attendance_record_repository;
pub mod attendance_session_repository;
pub mod registry_repository;

pub use attendance_record_repository::AttendanceRecordRepository;
pub use attendance_session_repository::AttendanceSessionRepository;
pub use registry_repository::RegistryRepository;
