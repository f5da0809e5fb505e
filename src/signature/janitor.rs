//! Periodic sweep of expired signatures.
//!
//! Validation already evicts an expired token when it is presented, but tokens
//! that are never presented again would otherwise stay in memory forever. The
//! janitor runs on a fixed period for the lifetime of the server and removes
//! every expired record in one pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::registry::SignatureRegistry;

/// Default sweep period (30 seconds).
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

/// Background sweeper for the signature registry.
pub struct Janitor {
    registry: Arc<SignatureRegistry>,
    interval: Duration,
}

impl Janitor {
    /// Create a janitor with the default sweep period.
    pub fn new(registry: Arc<SignatureRegistry>) -> Self {
        Self::with_interval(registry, DEFAULT_SWEEP_INTERVAL)
    }

    /// Create a janitor with a custom sweep period.
    pub fn with_interval(registry: Arc<SignatureRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// Run a single sweep and return the number of records removed.
    pub async fn sweep(&self) -> usize {
        let removed = self.registry.sweep_expired().await;
        if removed > 0 {
            debug!(removed = removed, "Swept expired signatures");
        }
        removed
    }

    /// Spawn the sweep loop on the current tokio runtime.
    ///
    /// The loop runs until [`JanitorHandle::shutdown`] is called or the handle
    /// is dropped.
    pub fn spawn(self) -> JanitorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let task = tokio::spawn(self.run(shutdown_rx));
        JanitorHandle { shutdown_tx, task }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep().await;
                }
                // Fires on an explicit signal and when the sender is dropped
                _ = shutdown_rx.changed() => {
                    debug!("Janitor stopping");
                    return;
                }
            }
        }
    }
}

/// Handle to a running janitor task.
pub struct JanitorHandle {
    shutdown_tx: watch::Sender<()>,
    task: JoinHandle<()>,
}

impl JanitorHandle {
    /// Signal the sweep loop to stop and wait for it to exit.
    pub async fn shutdown(self) {
        // The receiver is gone only if the task already exited.
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            debug!("Janitor task ended abnormally: {}", e);
        }
        info!("Signature janitor stopped");
    }

    /// Whether the sweep loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
