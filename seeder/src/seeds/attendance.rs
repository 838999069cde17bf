use crate::seed::Seeder;
use chrono::{Duration, Utc};
use db::models::attendance_record::Status;
use db::repositories::{AttendanceRecordRepository, AttendanceSessionRepository};
use db::seed::{DEFAULT_DEPARTMENTS, DEFAULT_SUBJECTS};
use fake::Fake;
use fake::faker::name::en::Name;
use rand::{Rng, SeedableRng, rngs::StdRng};
use sea_orm::{DatabaseConnection, DbErr};
use services::gateway::{AttendanceRecord, AttendanceSession};
use services::token;
use std::pin::Pin;

const PAST_SESSIONS: i64 = 8;
const PARTICIPANTS: usize = 25;

/// Inactive sessions from previous days with a realistic spread of check-ins,
/// so history and insight endpoints have data to show.
pub struct AttendanceHistorySeeder;

impl Seeder for AttendanceHistorySeeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), DbErr>> + Send + 'a>> {
        Box::pin(async move {
            let mut rng = StdRng::from_rng(&mut rand::rng());

            let participants: Vec<(String, String)> = (0..PARTICIPANTS)
                .map(|i| (format!("S{:03}", 101 + i), Name().fake_with_rng(&mut rng)))
                .collect();

            for day in 1..=PAST_SESSIONS {
                let (subject_id, subject_name) =
                    DEFAULT_SUBJECTS[rng.random_range(0..DEFAULT_SUBJECTS.len())];
                let start_time = Utc::now() - Duration::days(day);
                let id = token::new_session_id();
                let otp = token::generate_otp_with(&mut rng);

                let session = AttendanceSession {
                    qr_payload: token::qr_payload(&id, &otp),
                    id,
                    subject_id: subject_id.to_string(),
                    subject_name: subject_name.to_string(),
                    department: DEFAULT_DEPARTMENTS[0].to_string(),
                    faculty_id: "F001".to_string(),
                    start_time,
                    end_time: start_time + Duration::minutes(15),
                    otp,
                    active: false,
                };
                AttendanceSessionRepository::insert(db, session.clone()).await?;

                for (participant_id, participant_name) in &participants {
                    // Roughly one in five participants misses a given session.
                    if rng.random_bool(0.2) {
                        continue;
                    }
                    let late = rng.random_bool(0.1);
                    let offset = Duration::seconds(rng.random_range(0..15 * 60));
                    let record = AttendanceRecord {
                        id: token::new_record_id(),
                        session_id: session.id.clone(),
                        participant_id: participant_id.clone(),
                        participant_name: participant_name.clone(),
                        timestamp: session.start_time + offset,
                        status: if late { Status::Late } else { Status::Present },
                        location_verified: true,
                        otp_verified: true,
                        qr_verified: true,
                    };
                    AttendanceRecordRepository::insert(db, record).await?;
                }
            }
            Ok(())
        })
    }
}
