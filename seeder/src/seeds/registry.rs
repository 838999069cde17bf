use crate::seed::Seeder;
use sea_orm::{DatabaseConnection, DbErr};
use std::pin::Pin;

pub struct RegistrySeeder;

impl Seeder for RegistrySeeder {
    fn seed<'a>(
        &'a self,
        db: &'a DatabaseConnection,
    ) -> Pin<Box<dyn Future<Output = Result<(), DbErr>> + Send + 'a>> {
        Box::pin(db::seed::seed_registry(db))
    }
}
