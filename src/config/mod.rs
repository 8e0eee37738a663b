// Configuration module entry point
// Loads layered configuration: defaults, optional file, environment

mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

// Re-export public types
pub use types::{Config, FailurePolicy, LoggingConfig};

/// Default config file name (extension resolved by the config crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error; defaults and environment still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.on_error", "abort")?
            .set_default("data.file", "data.json")?
            .set_default("data.route", "/cpl/getshipper")?
            .set_default("routes.home_fallback", false)?
            .set_default("logging.access_log", true)?
            .set_default("logging.atomic_request_log", false)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ServerError::Config(format!("Invalid address: {e}")))
    }
}
