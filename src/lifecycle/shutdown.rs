//! Shutdown coordination.
//!
//! A `Shutdown` is held by whoever decides to stop (signal handler, tests);
//! each long-running task takes a `ShutdownHandle` and awaits it.

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Obtain a handle that resolves once shutdown is triggered.
    pub fn handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger shutdown. Idempotent.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Awaitable handle onto a `Shutdown`.
#[derive(Clone)]
pub struct ShutdownHandle {
    rx: watch::Receiver<bool>,
}

impl ShutdownHandle {
    /// Resolve once shutdown has been triggered.
    ///
    /// Also resolves if the coordinator is dropped, so tasks never hang on
    /// a shutdown that can no longer arrive.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
