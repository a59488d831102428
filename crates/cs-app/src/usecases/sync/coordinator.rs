use std::sync::Arc;

use cs_core::{preview, ClipboardProviderPort, ConnectionStatus, SessionError};
use tracing::{debug, info, info_span, warn, Instrument};

use super::SyncSession;
use crate::state::SharedSyncState;

/// Routes local changes to the session and remote changes to the clipboard.
pub struct SyncCoordinator {
    clipboard: Arc<dyn ClipboardProviderPort>,
    session: Arc<SyncSession>,
    state: SharedSyncState,
}

impl SyncCoordinator {
    pub fn new(
        clipboard: Arc<dyn ClipboardProviderPort>,
        session: Arc<SyncSession>,
        state: SharedSyncState,
    ) -> Self {
        Self {
            clipboard,
            session,
            state,
        }
    }

    /// Forward a local clipboard change to the peer.
    ///
    /// Dropped (not queued) while disconnected; the bootstrap push on the next
    /// connection carries the latest content instead.
    pub async fn on_local_change(&self, content: String) {
        let span = info_span!("usecase.sync.on_local_change", bytes = content.len());

        async {
            let connected = self.state.lock().await.status.is_connected();
            if !connected {
                debug!("Not connected, local change not sent");
                return;
            }

            match self.session.send(&content).await {
                Ok(()) => info!(preview = %preview(&content), "Local change sent"),
                Err(SessionError::NotConnected) => {
                    debug!("Link went away before send, local change not sent")
                }
                Err(err) => warn!(error = %err, "Failed to send local change"),
            }
        }
        .instrument(span)
        .await
    }

    /// Apply a remote clipboard change locally.
    ///
    /// Returns `true` when the clipboard was written. Content equal to the
    /// last-known content is skipped. The suppression window is opened and the
    /// write performed under the state lock, so no detector tick can observe
    /// the written content outside the window. A failed write restores the
    /// previous snapshot, so the failure affects only this change.
    pub async fn on_remote_change(&self, content: String) -> bool {
        let span = info_span!("usecase.sync.on_remote_change", bytes = content.len());

        async {
            let mut state = self.state.lock().await;
            let previous = state.snapshot.clone();
            if !state.snapshot.begin_remote_apply(&content) {
                debug!("Remote content already current, skipping write");
                return false;
            }

            match self.clipboard.write(&content) {
                Ok(()) => {
                    info!(preview = %preview(&content), "Remote clipboard applied");
                    true
                }
                Err(err) => {
                    state.snapshot = previous;
                    warn!(error = %err, "Failed to write remote clipboard");
                    false
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Mark the link connected and send the current local clipboard.
    ///
    /// Status and snapshot are updated under one lock hold, so a detector
    /// tick racing with the connect either runs before (and its change is
    /// carried by this push) or after (and sees nothing new). The outbound
    /// slot is reserved under the same hold, so a change detected after it
    /// reaches the peer after the pushed content. Returns `true` when
    /// something was sent. Empty or unreadable clipboards send nothing.
    pub async fn bootstrap_push(&self) -> bool {
        let span = info_span!("usecase.sync.bootstrap_push");

        async {
            let (slot, content) = {
                let mut state = self.state.lock().await;
                state.status = ConnectionStatus::Connected;
                let current = match self.clipboard.read() {
                    Ok(Some(current)) if !current.is_empty() => current,
                    Ok(_) => {
                        debug!("Clipboard empty, nothing to bootstrap");
                        return false;
                    }
                    Err(err) => {
                        warn!(error = %err, "Clipboard read failed, skipping bootstrap push");
                        return false;
                    }
                };
                state.snapshot.record_pushed(&current);
                (self.session.reserve_send().await, current)
            };

            match slot.send(&content).await {
                Ok(()) => {
                    info!(preview = %preview(&content), "Bootstrap push sent");
                    true
                }
                Err(err) => {
                    warn!(error = %err, "Bootstrap push failed");
                    false
                }
            }
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::state::new_shared_state;
    use crate::usecases::sync::test_support::{
        tag, target, MockClipboard, MockTransport, PeerLink,
    };
    use crate::usecases::sync::ChangeDetector;

    struct Fixture {
        clipboard: Arc<MockClipboard>,
        session: Arc<SyncSession>,
        state: SharedSyncState,
        coordinator: SyncCoordinator,
        peer: Option<PeerLink>,
    }

    async fn fixture(clipboard: Arc<MockClipboard>, connected: bool) -> Fixture {
        let (transport, mut peers) = MockTransport::new();
        let session = Arc::new(SyncSession::new(
            transport,
            tag("laptop"),
            Duration::from_secs(1),
        ));
        let state = new_shared_state();

        let peer = if connected {
            let _events = session.connect(&target()).await.unwrap();
            state.lock().await.status = ConnectionStatus::Connected;
            peers.recv().await
        } else {
            None
        };

        let coordinator = SyncCoordinator::new(clipboard.clone(), session.clone(), state.clone());
        Fixture {
            clipboard,
            session,
            state,
            coordinator,
            peer,
        }
    }

    #[tokio::test]
    async fn local_change_is_sent_when_connected() {
        let mut f = fixture(MockClipboard::empty(), true).await;

        f.coordinator.on_local_change("hello".to_string()).await;

        let frame = f.peer.as_mut().unwrap().next_sent().await.unwrap();
        assert!(frame.contains("\"content\":\"hello\""));
    }

    #[tokio::test]
    async fn local_change_is_dropped_when_disconnected() {
        let f = fixture(MockClipboard::empty(), false).await;

        f.coordinator.on_local_change("hello".to_string()).await;

        assert!(!f.session.is_connected().await);
    }

    #[tokio::test]
    async fn remote_change_writes_once_and_next_tick_is_silent() {
        let f = fixture(MockClipboard::empty(), true).await;
        let detector =
            ChangeDetector::new(f.clipboard.clone(), f.state.clone(), Duration::from_millis(500));

        assert!(f.coordinator.on_remote_change("world".to_string()).await);

        assert_eq!(f.clipboard.writes(), vec!["world".to_string()]);
        assert_eq!(detector.tick().await, None);
        assert!(!f.state.lock().await.snapshot.originated_remotely);
    }

    #[tokio::test]
    async fn remote_change_is_idempotent() {
        let f = fixture(MockClipboard::empty(), true).await;

        assert!(f.coordinator.on_remote_change("world".to_string()).await);
        assert!(!f.coordinator.on_remote_change("world".to_string()).await);

        assert_eq!(f.clipboard.writes().len(), 1);
    }

    #[tokio::test]
    async fn remote_change_is_not_echoed_back() {
        let mut f = fixture(MockClipboard::empty(), true).await;
        let detector =
            ChangeDetector::new(f.clipboard.clone(), f.state.clone(), Duration::from_millis(500));

        f.coordinator.on_remote_change("world".to_string()).await;
        if let Some(content) = detector.tick().await {
            f.coordinator.on_local_change(content).await;
        }

        assert!(f.peer.as_mut().unwrap().drain_sent().is_empty());
    }

    #[tokio::test]
    async fn failed_write_is_reported() {
        let clipboard = MockClipboard::empty();
        clipboard.fail_writes(true);
        let f = fixture(clipboard, true).await;

        assert!(!f.coordinator.on_remote_change("world".to_string()).await);
        assert!(f.clipboard.writes().is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_snapshot_as_before() {
        let f = fixture(MockClipboard::with_content("stale"), true).await;
        let detector =
            ChangeDetector::new(f.clipboard.clone(), f.state.clone(), Duration::from_millis(500));
        assert_eq!(detector.tick().await, Some("stale".to_string()));

        f.clipboard.fail_writes(true);
        assert!(!f.coordinator.on_remote_change("remote".to_string()).await);

        {
            let state = f.state.lock().await;
            assert_eq!(state.snapshot.content, "stale");
            assert!(!state.snapshot.originated_remotely);
        }

        // No window was left open: the next local copy is a change.
        f.clipboard.set("fresh");
        assert_eq!(detector.tick().await, Some("fresh".to_string()));

        // The same remote content is not mistaken for already applied.
        f.clipboard.fail_writes(false);
        assert!(f.coordinator.on_remote_change("remote".to_string()).await);
        assert_eq!(f.clipboard.writes(), vec!["remote".to_string()]);
    }

    #[tokio::test]
    async fn bootstrap_push_sends_current_content() {
        let mut f = fixture(MockClipboard::with_content("local"), true).await;
        let detector =
            ChangeDetector::new(f.clipboard.clone(), f.state.clone(), Duration::from_millis(500));

        assert!(f.coordinator.bootstrap_push().await);

        let frame = f.peer.as_mut().unwrap().next_sent().await.unwrap();
        assert!(frame.contains("\"content\":\"local\""));
        // Already pushed, so the detector does not send it a second time.
        assert_eq!(detector.tick().await, None);
    }

    #[tokio::test]
    async fn bootstrap_push_keeps_its_place_ahead_of_later_changes() {
        let f = fixture(MockClipboard::with_content("A"), true).await;
        let mut peer = f.peer;
        let coordinator = Arc::new(f.coordinator);

        let held = f.session.reserve_send().await;
        let push = tokio::spawn({
            let coordinator = Arc::clone(&coordinator);
            async move { coordinator.bootstrap_push().await }
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        // No detector tick can run until the push owns its outbound slot.
        assert!(f.state.try_lock().is_err());

        drop(held);
        assert!(push.await.unwrap());

        let detector =
            ChangeDetector::new(f.clipboard.clone(), f.state.clone(), Duration::from_millis(500));
        f.clipboard.set("B");
        let local = detector.tick().await.unwrap();
        coordinator.on_local_change(local).await;

        let peer = peer.as_mut().unwrap();
        assert!(peer.next_sent().await.unwrap().contains("\"content\":\"A\""));
        assert!(peer.next_sent().await.unwrap().contains("\"content\":\"B\""));
    }

    #[tokio::test]
    async fn bootstrap_push_skips_empty_clipboard() {
        let mut f = fixture(MockClipboard::empty(), true).await;

        assert!(!f.coordinator.bootstrap_push().await);
        assert!(f.peer.as_mut().unwrap().drain_sent().is_empty());
    }
}
