//! Background task that pushes status snapshots to every client
//!
//! A task is spawned by the registry on its 0 -> 1 transition and cancelled
//! on its 1 -> 0 transition. Each instance runs until cancelled; a stopped
//! task is never resumed, the registry spawns a new one instead.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Weak;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::registry::ConnectionRegistry;

/// Result of one delivery round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Connections that accepted the snapshot
    pub delivered: usize,
    /// Connections removed because the send failed
    pub pruned: usize,
}

/// A tick that could not complete; logged, never fatal to the loop
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("failed to serialize status snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("status tick panicked: {0}")]
    Panicked(String),
}

impl TickError {
    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::Panicked(message)
    }
}

/// Handle to a running broadcast loop
pub(crate) struct BroadcastTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl BroadcastTask {
    /// Spawn the loop on the current tokio runtime
    pub(crate) fn spawn(registry: Weak<ConnectionRegistry>, interval: Duration) -> Self {
        let token = CancellationToken::new();
        let handle = tokio::spawn(run(registry, interval, token.clone()));
        Self { token, handle }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signal the loop to stop. The loop exits at its next await point.
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    /// Signal the loop to stop and wait until it has exited
    pub(crate) async fn stop(self) {
        self.token.cancel();
        if let Err(err) = self.handle.await {
            tracing::warn!(error = %err, "status broadcast task did not exit cleanly");
        }
    }
}

async fn run(registry: Weak<ConnectionRegistry>, interval: Duration, token: CancellationToken) {
    tracing::debug!(interval_ms = interval.as_millis() as u64, "status broadcast loop running");

    loop {
        // Registry gone means the server is shutting down
        let Some(registry) = registry.upgrade() else {
            break;
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            outcome = AssertUnwindSafe(registry.tick(&token)).catch_unwind() => outcome,
        };
        drop(registry);

        match outcome.unwrap_or_else(|panic| Err(TickError::from_panic(panic))) {
            Ok(delivery) => tracing::trace!(
                delivered = delivery.delivered,
                pruned = delivery.pruned,
                "status tick"
            ),
            Err(err) => tracing::error!(error = %err, "status tick failed"),
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    tracing::debug!("status broadcast loop stopped");
}
