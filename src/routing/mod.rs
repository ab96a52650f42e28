//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (forward table lookup)
//!     → matcher.rs (prefix match + strip)
//!     → Return: matched Route + remainder, or NoMatch
//!
//! Table Compilation (at startup):
//!     RouteConfig[]
//!     → Parse upstream URLs, lowercase allow-lists
//!     → Sort longest-prefix-first
//!     → Freeze as immutable ForwardTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same path always matches same route
//! - Longest prefix wins (config order is irrelevant)

pub mod matcher;
pub mod router;

pub use router::{ForwardTable, Route};
