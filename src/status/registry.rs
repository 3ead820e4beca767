//! Registry of live status websocket connections

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::broadcaster::{BroadcastTask, Delivery, TickError};
use super::snapshot::StatusSnapshot;

/// Broadcast period used when none is configured
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Process-unique identifier of a registered connection
pub type ConnectionId = u64;

/// Outbound half of a connection; the socket task drains the receiver.
/// A send fails once that task has gone away.
pub type StatusSender = mpsc::Sender<String>;

/// State guarded by the registry lock
#[derive(Default)]
struct RegistryInner {
    connections: HashMap<ConnectionId, StatusSender>,
    task: Option<BroadcastTask>,
}

/// Tracks connected status clients and owns the single broadcast task.
///
/// The connection map and the task handle share one lock, so each
/// transition (insert + maybe start, remove + maybe stop) is atomic. The
/// lock is never held across an await point.
pub struct ConnectionRegistry {
    inner: Mutex<RegistryInner>,
    next_id: AtomicU64,
    tasks_started: AtomicU64,
    interval: Duration,
    /// Number of upcoming ticks that panic instead of sending
    #[cfg(test)]
    faulty_ticks: std::sync::atomic::AtomicUsize,
}

impl ConnectionRegistry {
    /// Create an empty registry broadcasting every `interval`
    pub fn new(interval: Duration) -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            next_id: AtomicU64::new(1),
            tasks_started: AtomicU64::new(0),
            interval,
            #[cfg(test)]
            faulty_ticks: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Broadcast period
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register a connection. Starts the broadcast task if this is the
    /// first client. Must be called from within a tokio runtime.
    pub fn connect(self: &Arc<Self>, sender: StatusSender) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut inner = self.inner.lock();
        inner.connections.insert(id, sender);
        let connected = inner.connections.len();

        if connected == 1 && inner.task.as_ref().map_or(true, BroadcastTask::is_finished) {
            inner.task = Some(BroadcastTask::spawn(Arc::downgrade(self), self.interval));
            self.tasks_started.fetch_add(1, Ordering::Relaxed);
            tracing::info!("status broadcast started");
        }
        drop(inner);

        tracing::debug!(connection_id = id, connected_clients = connected, "status client connected");
        id
    }

    /// Remove a connection. Unknown ids are ignored. Stops the broadcast
    /// task when the last client leaves.
    pub fn disconnect(&self, id: ConnectionId) {
        let mut inner = self.inner.lock();
        if inner.connections.remove(&id).is_none() {
            return;
        }
        let connected = inner.connections.len();

        if connected == 0 {
            if let Some(task) = inner.task.take() {
                task.cancel();
                tracing::info!("status broadcast stopped");
            }
        }
        drop(inner);

        tracing::debug!(connection_id = id, connected_clients = connected, "status client disconnected");
    }

    /// Send `snapshot` to every registered connection, dropping the ones
    /// whose send fails. No-op when nobody is connected.
    pub async fn broadcast(&self, snapshot: &StatusSnapshot) {
        if let Err(err) = self.deliver(snapshot).await {
            tracing::warn!(error = %err, "status broadcast failed");
        }
    }

    /// One broadcast tick on behalf of the task owning `token`.
    ///
    /// The cancellation check, the size and the membership copy are taken
    /// under the same lock `disconnect` cancels under, so a task stopped by
    /// a 1 -> 0 transition never reaches clients of the next task.
    pub(crate) async fn tick(&self, token: &CancellationToken) -> Result<Delivery, TickError> {
        #[cfg(test)]
        self.inject_fault();

        let (snapshot, members) = {
            let inner = self.inner.lock();
            if token.is_cancelled() {
                return Ok(Delivery::default());
            }
            (
                StatusSnapshot::running(inner.connections.len()),
                members_of(&inner),
            )
        };
        self.send_all(&snapshot, members).await
    }

    #[cfg(test)]
    fn inject_fault(&self) {
        let faulty = self
            .faulty_ticks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if faulty {
            panic!("faulty status tick");
        }
    }

    async fn deliver(&self, snapshot: &StatusSnapshot) -> Result<Delivery, TickError> {
        // Iterate over a copy so connect/disconnect can run during sends
        let members = members_of(&self.inner.lock());
        self.send_all(snapshot, members).await
    }

    async fn send_all(
        &self,
        snapshot: &StatusSnapshot,
        members: Vec<(ConnectionId, StatusSender)>,
    ) -> Result<Delivery, TickError> {
        if members.is_empty() {
            return Ok(Delivery::default());
        }

        let payload = serde_json::to_string(snapshot)?;

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (id, sender) in members {
            match sender.send(payload.clone()).await {
                Ok(()) => delivered += 1,
                Err(_) => {
                    tracing::warn!(connection_id = id, "status send failed, dropping client");
                    failed.push(id);
                }
            }
        }

        for id in &failed {
            self.disconnect(*id);
        }

        Ok(Delivery {
            delivered,
            pruned: failed.len(),
        })
    }

    /// Number of registered connections
    pub fn len(&self) -> usize {
        self.inner.lock().connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a broadcast task is currently recorded and alive
    pub fn is_broadcasting(&self) -> bool {
        self.inner
            .lock()
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Total number of broadcast tasks spawned over the registry's lifetime
    pub fn tasks_started(&self) -> u64 {
        self.tasks_started.load(Ordering::Relaxed)
    }

    /// Stop the broadcast task (if any) and wait for it to exit.
    /// Connections stay registered; used on server shutdown.
    pub async fn shutdown(&self) {
        let task = self.inner.lock().task.take();
        if let Some(task) = task {
            task.stop().await;
            tracing::info!("status broadcast shut down");
        }
    }
}

fn members_of(inner: &RegistryInner) -> Vec<(ConnectionId, StatusSender)> {
    inner
        .connections
        .iter()
        .map(|(id, sender)| (*id, sender.clone()))
        .collect()
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl Drop for ConnectionRegistry {
    fn drop(&mut self) {
        if let Some(task) = self.inner.get_mut().task.take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<ConnectionRegistry> {
        Arc::new(ConnectionRegistry::new(Duration::from_secs(3600)))
    }

    fn client() -> (StatusSender, mpsc::Receiver<String>) {
        mpsc::channel(8)
    }

    fn parse(payload: &str) -> StatusSnapshot {
        serde_json::from_str(payload).unwrap()
    }

    #[tokio::test]
    async fn test_task_lifecycle_follows_first_and_last_client() {
        let registry = registry();
        let (tx1, _rx1) = client();
        let (tx2, _rx2) = client();

        let c1 = registry.connect(tx1);
        assert_eq!(registry.len(), 1);
        assert!(registry.is_broadcasting());
        assert_eq!(registry.tasks_started(), 1);

        let c2 = registry.connect(tx2);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tasks_started(), 1);

        registry.disconnect(c1);
        assert_eq!(registry.len(), 1);
        assert!(registry.is_broadcasting());

        registry.disconnect(c2);
        assert!(registry.is_empty());
        assert!(!registry.is_broadcasting());
        assert_eq!(registry.tasks_started(), 1);
    }

    #[tokio::test]
    async fn test_churn_never_runs_two_tasks() {
        let registry = registry();
        let mut ids = Vec::new();
        let mut receivers = Vec::new();

        for round in 0..5 {
            for _ in 0..3 {
                let (tx, rx) = client();
                ids.push(registry.connect(tx));
                receivers.push(rx);
            }
            // positive-to-positive transitions leave the task alone
            registry.disconnect(ids.remove(0));
            assert!(registry.is_broadcasting());
            assert_eq!(registry.tasks_started(), round + 1);

            for id in ids.drain(..) {
                registry.disconnect(id);
            }
            assert!(!registry.is_broadcasting());
        }

        assert_eq!(registry.tasks_started(), 5);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_is_noop() {
        let registry = registry();
        registry.disconnect(12345);
        assert!(!registry.is_broadcasting());

        let (tx, _rx) = client();
        let id = registry.connect(tx);
        registry.disconnect(id + 100);
        assert_eq!(registry.len(), 1);
        assert!(registry.is_broadcasting());

        registry.disconnect(id);
        registry.disconnect(id);
        assert!(registry.is_empty());
        assert_eq!(registry.tasks_started(), 1);
    }

    #[tokio::test]
    async fn test_broadcast_without_clients_is_noop() {
        let registry = registry();
        registry.broadcast(&StatusSnapshot::running(0)).await;

        let delivery = registry.deliver(&StatusSnapshot::running(0)).await.unwrap();
        assert_eq!(delivery, Delivery::default());
        assert_eq!(registry.tasks_started(), 0);
    }

    #[tokio::test]
    async fn test_failed_send_is_isolated_and_pruned() {
        let registry = registry();
        let (tx1, mut rx1) = client();
        let (tx2, rx2) = client();
        let (tx3, mut rx3) = client();

        registry.connect(tx1);
        let c2 = registry.connect(tx2);
        registry.connect(tx3);

        // first tick from the task itself
        assert_eq!(parse(&rx1.recv().await.unwrap()).connected_clients, 3);
        assert_eq!(parse(&rx3.recv().await.unwrap()).connected_clients, 3);

        drop(rx2);
        let delivery = registry.tick(&CancellationToken::new()).await.unwrap();
        assert_eq!(delivery, Delivery { delivered: 2, pruned: 1 });

        assert_eq!(parse(&rx1.recv().await.unwrap()).connected_clients, 3);
        assert_eq!(parse(&rx3.recv().await.unwrap()).connected_clients, 3);
        assert!(rx1.try_recv().is_err());
        assert!(rx3.try_recv().is_err());

        assert_eq!(registry.len(), 2);
        assert!(registry.is_broadcasting());
        registry.disconnect(c2);
        assert_eq!(registry.len(), 2);

        registry.tick(&CancellationToken::new()).await.unwrap();
        assert_eq!(parse(&rx1.recv().await.unwrap()).connected_clients, 2);
        assert_eq!(parse(&rx3.recv().await.unwrap()).connected_clients, 2);
    }

    #[tokio::test]
    async fn test_pruning_last_client_stops_task() {
        let registry = registry();
        let (tx, rx) = client();
        registry.connect(tx);
        assert!(registry.is_broadcasting());

        drop(rx);
        registry.broadcast(&StatusSnapshot::running(1)).await;

        assert!(registry.is_empty());
        assert!(!registry.is_broadcasting());
    }

    #[tokio::test]
    async fn test_reconnect_after_empty_starts_fresh_task() {
        let registry = registry();
        let (tx, _rx) = client();
        let id = registry.connect(tx);
        registry.disconnect(id);

        let (tx, mut rx) = client();
        registry.connect(tx);
        assert_eq!(registry.tasks_started(), 2);
        assert_eq!(parse(&rx.recv().await.unwrap()).connected_clients, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_ticks_once_per_interval() {
        let registry = Arc::new(ConnectionRegistry::new(Duration::from_secs(1)));
        let (tx, mut rx) = client();
        let id = registry.connect(tx);

        let start = tokio::time::Instant::now();
        for _ in 0..3 {
            let snapshot = parse(&rx.recv().await.unwrap());
            assert_eq!(snapshot.status, "running");
            assert_eq!(snapshot.connected_clients, 1);
        }
        // first tick is immediate, then one per second
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(3));

        registry.disconnect(id);
        assert!(!registry.is_broadcasting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_sends_nothing_more() {
        let registry = Arc::new(ConnectionRegistry::new(Duration::from_secs(1)));
        let (tx, mut rx) = client();
        let id = registry.connect(tx.clone());

        rx.recv().await.unwrap();
        registry.disconnect(id);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancelled_tick_sends_nothing() {
        let registry = registry();
        let (tx, mut rx) = client();
        registry.connect(tx);
        rx.recv().await.unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let delivery = registry.tick(&token).await.unwrap();

        assert_eq!(delivery, Delivery::default());
        assert!(rx.try_recv().is_err());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_tick_does_not_stop_loop() {
        let registry = Arc::new(ConnectionRegistry::new(Duration::from_secs(1)));
        registry.faulty_ticks.store(1, Ordering::SeqCst);
        let (tx, mut rx) = client();
        let id = registry.connect(tx);

        let start = tokio::time::Instant::now();
        let snapshot = parse(&rx.recv().await.unwrap());
        assert_eq!(snapshot.connected_clients, 1);
        // the first tick panicked, so the first frame is the second tick
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(registry.is_broadcasting());
        assert_eq!(registry.tasks_started(), 1);

        rx.recv().await.unwrap();
        registry.disconnect(id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_blocked_send() {
        let registry = Arc::new(ConnectionRegistry::new(Duration::from_millis(10)));
        // never drained: the second tick blocks waiting for capacity
        let (tx, mut rx) = mpsc::channel(1);
        registry.connect(tx);
        tokio::time::sleep(Duration::from_millis(50)).await;

        tokio::time::timeout(Duration::from_secs(1), registry.shutdown())
            .await
            .expect("shutdown should not wait for a blocked send");

        assert!(!registry.is_broadcasting());
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallel_churn_leaves_one_task() {
        let registry = Arc::new(ConnectionRegistry::new(Duration::from_millis(100)));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    for _ in 0..300 {
                        let (tx, rx) = client();
                        let id = registry.connect(tx);
                        tokio::task::yield_now().await;
                        registry.disconnect(id);
                        drop(rx);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.await.unwrap();
        }

        assert!(registry.is_empty());
        assert!(!registry.is_broadcasting());

        let started = registry.tasks_started();
        let (tx, mut rx) = client();
        let id = registry.connect(tx);
        assert_eq!(registry.tasks_started(), started + 1);

        // one live task: an immediate frame, then at most one per 100ms
        let start = std::time::Instant::now();
        tokio::time::sleep(Duration::from_millis(350)).await;
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        let ceiling = start.elapsed().as_millis() / 100 + 1;
        assert!(received >= 1 && received as u128 <= ceiling, "received {received} frames");

        registry.disconnect(id);
        assert!(!registry.is_broadcasting());
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let registry = registry();
        let (tx, _rx) = client();
        registry.connect(tx);

        registry.shutdown().await;
        assert!(!registry.is_broadcasting());
        assert_eq!(registry.len(), 1);
    }
}
