//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Entry point (prefix route or fetch endpoint)
//!     → upstream.rs (resolve target, allow-list check, upstream call)
//!     → headers.rs (outbound header policy)
//!     → error.rs (taxonomy → HTTP status + JSON body)
//!     → Relay: status verbatim, Content-Type if present, body streamed
//! ```
//!
//! # Design Decisions
//! - One forward() contract shared by every entry point; the allow-list
//!   check is inside it and cannot be skipped
//! - Nothing is retried, cached, or persisted; one call, one upstream hit

pub mod error;
pub mod headers;
pub mod upstream;

pub use error::ForwardError;
pub use upstream::Forwarder;
