use std::sync::Arc;
use std::time::Duration;

use cs_core::{ConnectionStatus, ServerAddress, StatusSinkPort};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, info_span, warn, Instrument};

use super::{SessionEvent, SessionEvents, SyncCoordinator, SyncSession};
use crate::state::SharedSyncState;

/// Single-slot retry timer.
///
/// Scheduling replaces any pending timer, so at most one retry is ever
/// outstanding. A fired timer sends one unit on the channel returned by
/// [`ReconnectScheduler::new`].
pub struct ReconnectScheduler {
    delay: Duration,
    fired_tx: mpsc::UnboundedSender<()>,
    pending: Option<JoinHandle<()>>,
    scheduled: u64,
}

impl ReconnectScheduler {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            delay,
            fired_tx,
            pending: None,
            scheduled: 0,
        };
        (scheduler, fired_rx)
    }

    pub fn schedule(&mut self) {
        self.cancel();

        let fired_tx = self.fired_tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = fired_tx.send(());
        }));
        self.scheduled += 1;
        debug!(delay_ms = delay.as_millis() as u64, "Reconnect timer scheduled");
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Number of timers scheduled over the scheduler's lifetime.
    pub fn scheduled_count(&self) -> u64 {
        self.scheduled
    }
}

impl Drop for ReconnectScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Counters reported when a controller stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconnectStats {
    pub connect_attempts: u64,
    pub connections: u64,
    pub scheduled_timers: u64,
}

enum Step {
    Shutdown,
    Retry,
    Event(Option<SessionEvent>),
}

/// Owns the connection lifecycle: connects, consumes session events, and
/// retries with a fixed delay after every failure or close.
pub struct ReconnectionController {
    target: ServerAddress,
    session: Arc<SyncSession>,
    coordinator: Arc<SyncCoordinator>,
    state: SharedSyncState,
    status_sink: Arc<dyn StatusSinkPort>,
    scheduler: ReconnectScheduler,
    retry_rx: mpsc::UnboundedReceiver<()>,
    events: Option<SessionEvents>,
    stats: ReconnectStats,
}

impl ReconnectionController {
    pub fn new(
        target: ServerAddress,
        session: Arc<SyncSession>,
        coordinator: Arc<SyncCoordinator>,
        state: SharedSyncState,
        status_sink: Arc<dyn StatusSinkPort>,
        reconnect_delay: Duration,
    ) -> Self {
        let (scheduler, retry_rx) = ReconnectScheduler::new(reconnect_delay);
        Self {
            target,
            session,
            coordinator,
            state,
            status_sink,
            scheduler,
            retry_rx,
            events: None,
            stats: ReconnectStats::default(),
        }
    }

    /// Drive the connection until `shutdown` flips to `true` (or its sender
    /// is dropped). Ends with status `Disconnected`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ReconnectStats {
        let span = info_span!("usecase.sync.reconnect", server = %self.target);

        async move {
            self.publish(ConnectionStatus::Connecting, "connecting").await;

            if self.attempt(&mut shutdown).await {
                loop {
                    let step = tokio::select! {
                        biased;
                        _ = stop_requested(&mut shutdown) => Step::Shutdown,
                        Some(()) = self.retry_rx.recv() => Step::Retry,
                        event = next_event(&mut self.events) => Step::Event(event),
                    };

                    match step {
                        Step::Shutdown => break,
                        Step::Retry => {
                            if !self.attempt(&mut shutdown).await {
                                break;
                            }
                        }
                        Step::Event(Some(SessionEvent::RemoteChange(content))) => {
                            self.coordinator.on_remote_change(content).await;
                        }
                        Step::Event(Some(SessionEvent::Closed(reason))) => {
                            self.on_closed(&reason).await;
                        }
                        Step::Event(None) => self.on_closed("session ended").await,
                    }
                }
            }

            self.scheduler.cancel();
            self.events = None;
            self.session.disconnect().await;
            self.publish(ConnectionStatus::Disconnected, "stopped").await;

            self.stats.scheduled_timers = self.scheduler.scheduled_count();
            info!(
                attempts = self.stats.connect_attempts,
                connections = self.stats.connections,
                "Reconnection controller stopped"
            );
            self.stats
        }
        .instrument(span)
        .await
    }

    /// One connect attempt. Returns `false` when shutdown interrupted it.
    async fn attempt(&mut self, shutdown: &mut watch::Receiver<bool>) -> bool {
        self.stats.connect_attempts += 1;

        let result = tokio::select! {
            biased;
            _ = stop_requested(shutdown) => return false,
            result = self.session.connect(&self.target) => result,
        };

        match result {
            Ok(events) => {
                self.events = Some(events);
                self.stats.connections += 1;
                self.coordinator.bootstrap_push().await;
                self.publish(ConnectionStatus::Connected, "connected").await;
            }
            Err(err) => {
                warn!(
                    error = %err,
                    attempt = self.stats.connect_attempts,
                    "Connect attempt failed"
                );
                self.publish(ConnectionStatus::Connecting, &err.to_string()).await;
                self.scheduler.schedule();
            }
        }
        true
    }

    async fn on_closed(&mut self, reason: &str) {
        info!(reason, "Connection closed, scheduling reconnect");
        self.events = None;
        self.session.disconnect().await;
        self.publish(ConnectionStatus::Connecting, reason).await;
        self.scheduler.schedule();
    }

    async fn publish(&self, status: ConnectionStatus, detail: &str) {
        self.state.lock().await.status = status;
        debug!(status = %status, detail, "Connection status changed");
        self.status_sink.on_status_change(status, detail);
    }
}

/// Resolves once shutdown is requested or the sender is gone.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

async fn next_event(events: &mut Option<SessionEvents>) -> Option<SessionEvent> {
    match events {
        Some(events) => events.next().await,
        None => std::future::pending().await,
    }
}
