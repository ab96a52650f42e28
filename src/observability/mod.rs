//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; every forwarded call logs its
//!   resolved upstream URL
//! - Request ID flows through all log events via the request-ID middleware

pub mod logging;

pub use logging::init_logging;
