//! Server error types
//!
//! Every failure the server's own logic can hit is surfaced as a
//! [`ServerError`]. Whether an error ends the process or only the current
//! request is decided by the connection layer's failure policy.

use std::net::SocketAddr;

/// Type-erased error produced by a request body
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The request body could not be read for the request dump
    #[error("failed to dump request: {0}")]
    RequestDump(#[source] BoxError),

    /// The data file could not be opened or read
    #[error("open {path}: {source}")]
    DataFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The data file is not valid JSON
    #[error("indent {path}: {source}")]
    DataFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("listen tcp {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
