pub mod models;
pub mod repositories;
pub mod seed;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Normalizes a configured database location into a DSN.
///
/// DSNs are passed through; anything else is treated as a SQLite file path
/// whose parent directory is created on demand.
pub fn database_url(path_or_url: &str) -> String {
    if path_or_url.starts_with("sqlite:")
        || path_or_url.starts_with("postgres://")
        || path_or_url.starts_with("postgresql://")
    {
        path_or_url.to_string()
    } else {
        // SQLite won't create intermediate dirs.
        if let Err(e) = util::paths::ensure_parent_dir(path_or_url) {
            tracing::warn!(path = path_or_url, error = %e, "Could not create database directory");
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    }
}

/// Opens a connection pool. The error is returned instead of panicking so
/// callers can fall back to another store.
pub async fn connect(path_or_url: &str, timeout: Duration) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url(path_or_url));
    options
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);
    Database::connect(options).await
}
