use crate::models::attendance_record::{ActiveModel, Column, Entity, Model};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

pub struct AttendanceRecordRepository;

impl AttendanceRecordRepository {
    /// Inserts a record. A second record for the same `(session_id,
    /// participant_id)` fails with a unique constraint violation.
    pub async fn insert<C>(db: &C, record: Model) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let am = ActiveModel {
            id: Set(record.id),
            session_id: Set(record.session_id),
            participant_id: Set(record.participant_id),
            participant_name: Set(record.participant_name),
            timestamp: Set(record.timestamp),
            status: Set(record.status),
            location_verified: Set(record.location_verified),
            otp_verified: Set(record.otp_verified),
            qr_verified: Set(record.qr_verified),
        };
        am.insert(db).await
    }

    pub async fn for_session<C>(db: &C, session_id: &str) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .order_by_asc(Column::Timestamp)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub async fn for_participant<C>(db: &C, participant_id: &str) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::ParticipantId.eq(participant_id))
            .order_by_asc(Column::Timestamp)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
