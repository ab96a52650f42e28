//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, handlers)
//!     → request.rs (attach request ID)
//!     → cors.rs (preflight short-circuit, response headers)
//!     → [forward table picks route, forwarder calls upstream]
//!     → Relay response to client
//! ```

pub mod cors;
pub mod request;
pub mod server;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
