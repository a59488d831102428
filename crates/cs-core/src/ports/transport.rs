use async_trait::async_trait;
use tokio::sync::mpsc;

use super::TransportError;
use crate::network::{ServerAddress, TransportCommand, TransportEvent};

/// A live message-oriented connection.
///
/// Dropping `commands` closes the connection. `events` yields
/// `TransportEvent::Opened` first and ends after one terminal event.
#[derive(Debug)]
pub struct TransportChannel {
    pub commands: mpsc::UnboundedSender<TransportCommand>,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

/// Transport port - opens connections to a peer.
///
/// The transport provides message boundaries; one text frame carries one
/// wire message.
#[async_trait]
pub trait TransportPort: Send + Sync {
    async fn connect(&self, target: &ServerAddress) -> Result<TransportChannel, TransportError>;
}
