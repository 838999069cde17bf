use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::seed::seed_registry;

/// In-memory SQLite database with all migrations applied and the default
/// registry seeded.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    seed_registry(&db).await.expect("Failed to seed registry");

    db
}
