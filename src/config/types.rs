// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Runtime worker threads. Connections are served on the main thread's
    /// `LocalSet`; the workers drive socket readiness and timers for it.
    pub workers: Option<usize>,
    /// What to do when request handling hits an internal error
    #[serde(default)]
    pub on_error: FailurePolicy,
}

/// Static data endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// JSON file served by the data route
    pub file: String,
    /// Exact path the data file is served on
    pub route: String,
}

/// Routes configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RoutesConfig {
    /// Serve the fixed home greeting for every unmatched path
    #[serde(default)]
    pub home_fallback: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Buffer a request's log block and flush it as one write
    #[serde(default)]
    pub atomic_request_log: bool,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Failure policy for errors raised while handling a request
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the error as fatal and terminate the process
    #[default]
    Abort,
    /// Log the error and answer the request with 500
    Respond,
}
