use crate::models::{department, subject};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder};

pub struct RegistryRepository;

impl RegistryRepository {
    pub async fn find_subject<C>(db: &C, id: &str) -> Result<Option<subject::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        subject::Entity::find_by_id(id.to_owned()).one(db).await
    }

    pub async fn department_exists<C>(db: &C, name: &str) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let count = department::Entity::find_by_id(name.to_owned())
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn subjects<C>(db: &C) -> Result<Vec<subject::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        subject::Entity::find()
            .order_by_asc(subject::Column::Id)
            .all(db)
            .await
    }

    pub async fn departments<C>(db: &C) -> Result<Vec<department::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        department::Entity::find()
            .order_by_asc(department::Column::Name)
            .all(db)
            .await
    }
}
