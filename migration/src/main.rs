use std::{fs, path::Path};
use util::config;

mod runner;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url = config::database_url();
    let url = if database_url.is_empty() {
        "sqlite://data/attendance.db?mode=rwc".to_string()
    } else {
        database_url
    };
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_sqlite_file(&url);
            remove_local_store();
        }
        Some("fresh") => {
            remove_sqlite_file(&url);
            remove_local_store();
            create_sqlite_dir(&url);
            runner::run_all_migrations(&url).await;
        }
        _ => {
            create_sqlite_dir(&url);
            runner::run_all_migrations(&url).await;
        }
    }
}

/// File path part of a `sqlite://` URL, if the URL names a file.
fn sqlite_file(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty() && path != ":memory:").then_some(path)
}

fn remove_sqlite_file(url: &str) {
    let Some(path) = sqlite_file(url) else {
        println!("Not a SQLite file URL, nothing to delete");
        return;
    };
    let db_path = Path::new(path);
    if db_path.exists() {
        match fs::remove_file(db_path) {
            Ok(()) => println!("Deleted DB: {}", db_path.display()),
            Err(e) => eprintln!("Failed to delete {}: {e}", db_path.display()),
        }
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
}

fn remove_local_store() {
    let store = util::paths::local_store_path();
    if store.exists() {
        match fs::remove_file(&store) {
            Ok(()) => println!("Deleted local store: {}", store.display()),
            Err(e) => eprintln!("Failed to delete {}: {e}", store.display()),
        }
    }
}

fn create_sqlite_dir(url: &str) {
    if let Some(path) = sqlite_file(url) {
        if let Err(e) = util::paths::ensure_parent_dir(path) {
            eprintln!("Failed to create DB directory: {e}");
        }
    }
}
