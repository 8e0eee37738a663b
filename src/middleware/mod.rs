//! Middleware module
//!
//! Wrappers that sit between the connection layer and the route handlers.

pub mod logging;
pub mod recorder;

pub use logging::LoggingMiddleware;
pub use recorder::ResponseRecord;
