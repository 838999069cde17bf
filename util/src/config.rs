//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.
//!
//! Every key has a default, so a bare environment yields a working
//! local-only deployment.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_url: String,
    pub database_connect_timeout_ms: u64,
    pub local_store_path: String,
    pub host: String,
    pub port: u16,
    pub campus_latitude: f64,
    pub campus_longitude: f64,
    pub campus_radius_meters: f64,
    pub window_open_minute: u32,
    pub window_close_minute: u32,
    pub gemini_api_key: String,
    pub gemini_model: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring malformed config value");
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Malformed numeric values fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "campus-attendance"),
            log_level: var_or("LOG_LEVEL", "api=info,services=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            database_url: var_or("DATABASE_URL", ""),
            database_connect_timeout_ms: parsed_or("DATABASE_CONNECT_TIMEOUT_MS", 3000),
            local_store_path: var_or("LOCAL_STORE_PATH", "data/local_store.json"),
            host: var_or("HOST", "127.0.0.1"),
            port: parsed_or("PORT", 3000),
            campus_latitude: parsed_or("CAMPUS_LATITUDE", 11.0827),
            campus_longitude: parsed_or("CAMPUS_LONGITUDE", 77.0003),
            campus_radius_meters: parsed_or("CAMPUS_RADIUS_METERS", 800.0),
            window_open_minute: parsed_or("WINDOW_OPEN_MINUTE", 0),
            window_close_minute: parsed_or("WINDOW_CLOSE_MINUTE", 1440),
            gemini_api_key: var_or("GEMINI_API_KEY", ""),
            gemini_model: var_or("GEMINI_MODEL", "gemini-2.5-flash"),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// A poisoned lock is recovered, since the config holds no invariants
    /// that a panicking writer could break.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_database_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_url = value.into());
    }

    pub fn set_local_store_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.local_store_path = value.into());
    }

    pub fn set_campus(latitude: f64, longitude: f64, radius_meters: f64) {
        AppConfig::set_field(|cfg| {
            cfg.campus_latitude = latitude;
            cfg.campus_longitude = longitude;
            cfg.campus_radius_meters = radius_meters;
        });
    }

    pub fn set_operating_window(open_minute: u32, close_minute: u32) {
        AppConfig::set_field(|cfg| {
            cfg.window_open_minute = open_minute;
            cfg.window_close_minute = close_minute;
        });
    }

    pub fn set_gemini_api_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.gemini_api_key = value.into());
    }
}

// --- Free-function accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_url() -> String {
    AppConfig::global().database_url.clone()
}

pub fn database_connect_timeout_ms() -> u64 {
    AppConfig::global().database_connect_timeout_ms
}

pub fn local_store_path() -> String {
    AppConfig::global().local_store_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

/// `(latitude, longitude, radius_meters)` of the campus geofence.
pub fn campus() -> (f64, f64, f64) {
    let cfg = AppConfig::global();
    (
        cfg.campus_latitude,
        cfg.campus_longitude,
        cfg.campus_radius_meters,
    )
}

/// `(open, close)` minute-of-day bounds of the daily check-in window.
pub fn operating_window() -> (u32, u32) {
    let cfg = AppConfig::global();
    (cfg.window_open_minute, cfg.window_close_minute)
}

pub fn gemini_api_key() -> String {
    AppConfig::global().gemini_api_key.clone()
}

pub fn gemini_model() -> String {
    AppConfig::global().gemini_model.clone()
}
