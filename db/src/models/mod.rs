pub mod attendance_record;
pub mod attendance_session;
pub mod department;
pub mod subject;

pub use attendance_record::Entity as AttendanceRecord;
pub use attendance_session::Entity as AttendanceSession;
pub use department::Entity as Department;
pub use subject::Entity as Subject;
