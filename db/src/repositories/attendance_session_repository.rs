use crate::models::attendance_session::{ActiveModel, Column, Entity, Model};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait, sea_query::Expr,
};

pub struct AttendanceSessionRepository;

impl AttendanceSessionRepository {
    pub async fn find_active<C>(db: &C) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::Active.eq(true))
            .order_by_desc(Column::StartTime)
            .one(db)
            .await
    }

    pub async fn find_by_id<C>(db: &C, id: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(id.to_owned()).one(db).await
    }

    pub async fn insert<C>(db: &C, session: Model) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let am = ActiveModel {
            id: Set(session.id),
            subject_id: Set(session.subject_id),
            subject_name: Set(session.subject_name),
            department: Set(session.department),
            faculty_id: Set(session.faculty_id),
            start_time: Set(session.start_time),
            end_time: Set(session.end_time),
            otp: Set(session.otp),
            qr_payload: Set(session.qr_payload),
            active: Set(session.active),
        };
        am.insert(db).await
    }

    /// Flips every active row to inactive and returns how many changed.
    pub async fn deactivate_all<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::Active, Expr::value(false))
            .filter(Column::Active.eq(true))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Deactivates all sessions and inserts `session` in one transaction, so
    /// readers never observe two active rows.
    pub async fn replace_active<C>(db: &C, session: Model) -> Result<Model, DbErr>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        Self::deactivate_all(&txn).await?;
        let inserted = Self::insert(&txn, session).await?;
        txn.commit().await?;
        Ok(inserted)
    }

    /// Returns whether a row was actually flipped.
    pub async fn deactivate<C>(db: &C, id: &str) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::update_many()
            .col_expr(Column::Active, Expr::value(false))
            .filter(Column::Id.eq(id))
            .filter(Column::Active.eq(true))
            .exec(db)
            .await?;
        Ok(res.rows_affected > 0)
    }
}
