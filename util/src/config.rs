//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub host: String,
    pub port: u16,
    /// Root directory of the filesystem report store.
    pub report_storage_root: String,
    /// Number of nested `test-suite` levels between `test-run` and `test-case`.
    pub report_suite_depth: usize,
    /// Upper bound on reports fetched and parsed at the same time.
    pub fetch_concurrency: usize,
    /// Sort marksheet rows by identity instead of first-seen order.
    pub marksheet_sort_rows: bool,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_or(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every field has a default, so a missing or unparsable variable never
    /// aborts start-up.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "marksheet".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info,marker=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: flag_or("LOG_TO_STDOUT", false),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: parse_or("PORT", 3000),
            report_storage_root: env::var("REPORT_STORAGE_ROOT")
                .unwrap_or_else(|_| "data/testresult".into()),
            report_suite_depth: parse_or("REPORT_SUITE_DEPTH", 3),
            fetch_concurrency: parse_or::<usize>("FETCH_CONCURRENCY", 8).max(1),
            marksheet_sort_rows: flag_or("MARKSHEET_SORT_ROWS", true),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            if let Ok(mut guard) = lock.write() {
                *guard = AppConfig::from_env();
            }
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_report_storage_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.report_storage_root = value.into());
    }

    pub fn set_report_suite_depth(value: usize) {
        AppConfig::set_field(|cfg| cfg.report_suite_depth = value);
    }

    pub fn set_fetch_concurrency(value: usize) {
        AppConfig::set_field(|cfg| cfg.fetch_concurrency = value.max(1));
    }

    pub fn set_marksheet_sort_rows(value: bool) {
        AppConfig::set_field(|cfg| cfg.marksheet_sort_rows = value);
    }
}

// --- Free accessors, read straight from the global instance ---

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

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn report_storage_root() -> String {
    AppConfig::global().report_storage_root.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 5] = [
        "PORT",
        "REPORT_SUITE_DEPTH",
        "FETCH_CONCURRENCY",
        "MARKSHEET_SORT_ROWS",
        "LOG_TO_STDOUT",
    ];

    fn clear() {
        for key in KEYS {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_when_unset() {
        clear();
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.report_suite_depth, 3);
        assert_eq!(cfg.fetch_concurrency, 8);
        assert!(cfg.marksheet_sort_rows);
        assert!(!cfg.log_to_stdout);
    }

    #[test]
    #[serial]
    fn env_values_override_defaults() {
        clear();
        unsafe {
            env::set_var("PORT", "8088");
            env::set_var("REPORT_SUITE_DEPTH", "2");
            env::set_var("MARKSHEET_SORT_ROWS", "false");
            env::set_var("LOG_TO_STDOUT", "TRUE");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.port, 8088);
        assert_eq!(cfg.report_suite_depth, 2);
        assert!(!cfg.marksheet_sort_rows);
        assert!(cfg.log_to_stdout);
        clear();
    }

    #[test]
    #[serial]
    fn garbage_numbers_fall_back() {
        clear();
        unsafe {
            env::set_var("PORT", "not-a-port");
            env::set_var("FETCH_CONCURRENCY", "0");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.fetch_concurrency, 1);
        clear();
    }

    #[test]
    #[serial]
    fn setters_update_global() {
        AppConfig::set_report_suite_depth(5);
        assert_eq!(AppConfig::global().report_suite_depth, 5);
        AppConfig::set_fetch_concurrency(0);
        assert_eq!(AppConfig::global().fetch_concurrency, 1);
        clear();
        AppConfig::reset();
        assert_eq!(AppConfig::global().report_suite_depth, 3);
    }
}
