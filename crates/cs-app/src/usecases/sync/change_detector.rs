use std::sync::Arc;
use std::time::Duration;

use cs_core::{preview, ClipboardProviderPort, TickOutcome};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::SyncCoordinator;
use crate::state::SharedSyncState;

/// Polls the local clipboard and reports genuine local changes.
///
/// Each tick runs under the shared state lock, so it is ordered with respect
/// to remote applies: a tick either sees the state before an apply, or the
/// written content together with the open suppression window.
pub struct ChangeDetector {
    clipboard: Arc<dyn ClipboardProviderPort>,
    state: SharedSyncState,
    interval: Duration,
}

impl ChangeDetector {
    pub fn new(
        clipboard: Arc<dyn ClipboardProviderPort>,
        state: SharedSyncState,
        interval: Duration,
    ) -> Self {
        Self {
            clipboard,
            state,
            interval,
        }
    }

    /// Run one detector tick.
    ///
    /// Returns the new content when the clipboard changed locally.
    pub async fn tick(&self) -> Option<String> {
        let mut state = self.state.lock().await;

        let current = match self.clipboard.read() {
            Ok(current) => current,
            Err(err) => {
                warn!(error = %err, "Clipboard read failed, skipping tick");
                None
            }
        };

        match state.snapshot.observe(current) {
            TickOutcome::Changed(content) => {
                info!(preview = %preview(&content), "Local clipboard change detected");
                Some(content)
            }
            TickOutcome::Suppressed => {
                debug!("Clipboard read-back of a remote apply suppressed");
                None
            }
            TickOutcome::Unchanged | TickOutcome::NoContent => None,
        }
    }

    /// Tick until `shutdown` flips to `true` (or its sender is dropped),
    /// forwarding local changes to `coordinator`.
    pub async fn run(
        self,
        coordinator: Arc<SyncCoordinator>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(interval_ms = self.interval.as_millis() as u64, "Change detector started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Some(content) = self.tick().await {
                        coordinator.on_local_change(content).await;
                    }
                }
            }
        }

        debug!("Change detector stopped");
    }
}
