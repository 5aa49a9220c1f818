// Configuration module entry point
// Loads file/environment settings and derives the dispatcher Config

mod types;

use std::net::SocketAddr;
use std::time::Duration;

pub use types::{
    normalize_base_url, Config, DispatchConfig, ListenConfig, LoggingConfig, Settings,
    DEFAULT_BASE_URL, DEFAULT_READ_TIMEOUT, DEFAULT_WRITE_TIMEOUT,
};

impl Settings {
    /// Load settings from the given file path (extension optional)
    ///
    /// A missing file is fine: every key has a default, and `SERVER__*`
    /// environment variables override both, e.g. `SERVER__DISPATCH__BASE_URL`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("dispatch.base_url", DEFAULT_BASE_URL)?
            .set_default("dispatch.read_timeout", DEFAULT_READ_TIMEOUT.as_secs())?
            .set_default("dispatch.write_timeout", DEFAULT_WRITE_TIMEOUT.as_secs())?
            .set_default("dispatch.keep_alive", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .build()?;

        settings.try_deserialize()
    }

    /// Load `config.toml` from the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Dispatcher config described by these settings
    pub fn to_config(&self) -> Config {
        Config {
            base_url: self.dispatch.base_url.clone(),
            read_timeout: Duration::from_secs(self.dispatch.read_timeout),
            write_timeout: Duration::from_secs(self.dispatch.write_timeout),
            keep_alive: self.dispatch.keep_alive,
        }
    }
}
