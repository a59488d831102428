use crate::network::ConnectionStatus;

/// Receives connection status transitions for display.
///
/// Fire-and-forget: implementations must not block and must not fail.
pub trait StatusSinkPort: Send + Sync {
    fn on_status_change(&self, status: ConnectionStatus, detail: &str);
}
