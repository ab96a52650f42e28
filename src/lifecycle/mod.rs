//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Compile forward table → Bind → Serve
//!
//! Shutdown:
//!     SIGINT/Ctrl-C → Shutdown::trigger → server drains → exit
//! ```

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownHandle};
