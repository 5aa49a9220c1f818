// Configuration types module
// File-level settings and the dispatcher's runtime Config

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "/";
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings loaded from `config.toml` and `SERVER__*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ListenConfig,
    pub dispatch: DispatchConfig,
    pub logging: LoggingConfig,
}

/// Listen address and runtime sizing
#[derive(Debug, Deserialize, Clone)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Dispatcher settings as written in the file (timeouts in seconds)
#[derive(Debug, Deserialize, Clone)]
pub struct DispatchConfig {
    pub base_url: String,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub keep_alive: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// combined, common or json
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Server configuration owned by the server shell
///
/// Empty or zero fields mean "unset" and are filled in by
/// [`Config::with_defaults`] when the server is frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub keep_alive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            read_timeout: Duration::ZERO,
            write_timeout: Duration::ZERO,
            keep_alive: true,
        }
    }
}

impl Config {
    /// Fill every unset field with its default, each independently
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.base_url = if self.base_url.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            normalize_base_url(&self.base_url)
        };
        if self.read_timeout.is_zero() {
            self.read_timeout = DEFAULT_READ_TIMEOUT;
        }
        if self.write_timeout.is_zero() {
            self.write_timeout = DEFAULT_WRITE_TIMEOUT;
        }
        self
    }
}

/// Normalize a base URL so it starts and ends with `/`
///
/// `"test"`, `"/test/"` and `"test/"` all become `"/test/"`; an empty or
/// all-slash input becomes `"/"`.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("test"), "/test/");
        assert_eq!(normalize_base_url("/test/"), "/test/");
        assert_eq!(normalize_base_url("test/"), "/test/");
        assert_eq!(normalize_base_url("/api/v1"), "/api/v1/");
        assert_eq!(normalize_base_url(""), "/");
        assert_eq!(normalize_base_url("///"), "/");
    }

    #[test]
    fn test_defaults_fill_unset_fields() {
        let cfg = Config::default().with_defaults();
        assert_eq!(cfg.base_url, "/");
        assert_eq!(cfg.read_timeout, DEFAULT_READ_TIMEOUT);
        assert_eq!(cfg.write_timeout, DEFAULT_WRITE_TIMEOUT);
    }

    #[test]
    fn test_defaults_are_independent() {
        let cfg = Config {
            base_url: "shop".to_string(),
            read_timeout: Duration::from_secs(7),
            ..Config::default()
        }
        .with_defaults();
        assert_eq!(cfg.base_url, "/shop/");
        assert_eq!(cfg.read_timeout, Duration::from_secs(7));
        assert_eq!(cfg.write_timeout, DEFAULT_WRITE_TIMEOUT);
    }
}
