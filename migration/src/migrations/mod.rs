pub mod m202601050001_create_registry;
pub mod m202601050002_create_attendance_sessions;
pub mod m202601050003_create_attendance_records;
