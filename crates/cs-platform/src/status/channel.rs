use cs_core::{ConnectionStatus, StatusSinkPort};
use tokio::sync::watch;

/// Latest status published by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: ConnectionStatus,
    pub detail: String,
}

/// Publishes status transitions on a `watch` channel.
///
/// Receivers only ever see the latest transition; intermediate ones may be
/// skipped when nobody is polling.
pub struct ChannelStatusSink {
    tx: watch::Sender<StatusUpdate>,
}

impl ChannelStatusSink {
    pub fn new() -> (Self, watch::Receiver<StatusUpdate>) {
        let (tx, rx) = watch::channel(StatusUpdate::default());
        (Self { tx }, rx)
    }
}

impl StatusSinkPort for ChannelStatusSink {
    fn on_status_change(&self, status: ConnectionStatus, detail: &str) {
        // send_replace keeps the value even when no receiver is alive.
        self.tx.send_replace(StatusUpdate {
            status,
            detail: detail.to_string(),
        });
    }
}
