//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_DB_DIR_NAME, DEFAULT_ITEM_CACHE_CAPACITY, DEFAULT_LIST_PAGE_SIZE};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for Quentier.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub list_page_size: usize,
    pub cache_capacity: usize,
    pub backend_perf_log: bool,
}

/// Replace a leading `~/` with the home directory, when one is known.
fn expand_tilde(path: String) -> String {
    let Some(rest) = path.strip_prefix("~/") else {
        return path;
    };
    match resolve_home_dir() {
        Some(home) => home.join(rest).to_string_lossy().into_owned(),
        None => path,
    }
}

fn resolve_home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Parse a positive count from the environment, ignoring zero and garbage.
fn env_positive_usize(name: &str) -> Option<usize> {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

/// Default database location: `~/.cache/quentier/db`.
pub fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join(DEFAULT_DB_DIR_NAME)
        .join("db")
        .to_string_lossy()
        .to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("QUENTIER_DB_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(expand_tilde)
                .unwrap_or_else(default_db_path),
            list_page_size: env_positive_usize("QUENTIER_LIST_PAGE_SIZE")
                .unwrap_or(DEFAULT_LIST_PAGE_SIZE),
            cache_capacity: env_positive_usize("QUENTIER_CACHE_CAPACITY")
                .unwrap_or(DEFAULT_ITEM_CACHE_CAPACITY),
            backend_perf_log: env_flag_enabled("QUENTIER_BACKEND_PERF_LOG"),
        }
    }

    /// Replace the database path, expanding a leading `~/`.
    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = expand_tilde(db_path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_env_flag, Config};
    use crate::constants::{DEFAULT_ITEM_CACHE_CAPACITY, DEFAULT_LIST_PAGE_SIZE};
    use crate::env::{env_lock, EnvGuard};

    #[test]
    fn env_flags_parse_loosely_and_reject_garbage() {
        let cases = [
            (" YES ", Some(true)),
            ("1", Some(true)),
            ("On", Some(true)),
            ("", Some(false)),
            ("off", Some(false)),
            ("No", Some(false)),
            ("maybe", None),
            ("2", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(parse_env_flag(raw), expected, "raw: {:?}", raw);
        }
    }

    #[test]
    fn from_env_applies_overrides_and_ignores_invalid_sizes() {
        let _lock = env_lock().lock().expect("env lock");
        let _db = EnvGuard::set("QUENTIER_DB_PATH", "/tmp/quentier-config-test");
        let _page = EnvGuard::set("QUENTIER_LIST_PAGE_SIZE", "7");
        let _cache = EnvGuard::set("QUENTIER_CACHE_CAPACITY", "0");
        let _perf = EnvGuard::set("QUENTIER_BACKEND_PERF_LOG", "on");

        let config = Config::from_env();
        assert_eq!(config.db_path, "/tmp/quentier-config-test");
        assert_eq!(config.list_page_size, 7);
        assert_eq!(config.cache_capacity, DEFAULT_ITEM_CACHE_CAPACITY);
        assert!(config.backend_perf_log);
    }

    #[test]
    fn from_env_defaults_when_unset() {
        let _lock = env_lock().lock().expect("env lock");
        let _db = EnvGuard::remove("QUENTIER_DB_PATH");
        let _page = EnvGuard::remove("QUENTIER_LIST_PAGE_SIZE");
        let _cache = EnvGuard::remove("QUENTIER_CACHE_CAPACITY");
        let _perf = EnvGuard::remove("QUENTIER_BACKEND_PERF_LOG");

        let config = Config::from_env();
        assert!(config.db_path.ends_with("db"));
        assert!(config.db_path.contains("quentier"));
        assert_eq!(config.list_page_size, DEFAULT_LIST_PAGE_SIZE);
        assert!(!config.backend_perf_log);
    }
}
