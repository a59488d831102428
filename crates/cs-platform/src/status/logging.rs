use cs_core::{ConnectionStatus, StatusSinkPort};
use tracing::{info, warn};

/// Writes connection status transitions to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatusSink;

impl StatusSinkPort for TracingStatusSink {
    fn on_status_change(&self, status: ConnectionStatus, detail: &str) {
        match status {
            ConnectionStatus::Connected => info!(status = %status, detail, "Connected to server"),
            ConnectionStatus::Connecting => info!(status = %status, detail, "Connecting to server"),
            ConnectionStatus::Disconnected => warn!(status = %status, detail, "Disconnected"),
        }
    }
}
