use crate::seed::{Seeder, run_seeder};
use crate::seeds::{attendance::AttendanceHistorySeeder, registry::RegistrySeeder};
use std::time::Duration;
use util::config;

mod seed;
mod seeds;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/attendance.db?mode=rwc";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let url = match config::database_url() {
        url if url.is_empty() => DEFAULT_DATABASE_URL.to_string(),
        url => url,
    };
    let timeout = Duration::from_millis(config::database_connect_timeout_ms());

    let db = match db::connect(&url, timeout).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("DB connection failed: {e}");
            std::process::exit(1);
        }
    };

    let with_history = std::env::args().any(|a| a == "--with-history");

    let mut seeders = vec![(
        Box::new(RegistrySeeder) as Box<dyn Seeder + Send + Sync>,
        "Registry",
    )];
    if with_history {
        seeders.push((Box::new(AttendanceHistorySeeder), "AttendanceHistory"));
    }

    for (seeder, name) in seeders {
        run_seeder(&*seeder, name, &db).await;
    }
}
