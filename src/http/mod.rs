//! HTTP protocol layer module
//!
//! Provides the response sink abstraction and the protocol-level helpers
//! built on it, decoupled from specific routes.

pub mod response;
pub mod sniff;
pub mod writer;

// Re-export commonly used types
pub use response::{build_500_response, not_found};
pub use writer::{BufferedResponse, ResponseWriter};
