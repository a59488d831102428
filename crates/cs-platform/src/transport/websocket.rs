use std::time::Duration;

use async_trait::async_trait;
use cs_core::{
    ServerAddress, TransportChannel, TransportCommand, TransportError, TransportEvent,
    TransportPort,
};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Websocket client transport.
///
/// Every successful connect spawns one task that owns the socket until the
/// link ends, translating frames to [`TransportEvent`]s and
/// [`TransportCommand`]s to frames.
pub struct WebSocketTransport {
    connect_timeout: Duration,
}

impl WebSocketTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl TransportPort for WebSocketTransport {
    async fn connect(&self, target: &ServerAddress) -> Result<TransportChannel, TransportError> {
        debug!(server = %target, "Opening websocket");

        let (stream, _response) = timeout(self.connect_timeout, connect_async(target.as_str()))
            .await
            .map_err(|_| TransportError::ConnectTimeout {
                target: target.to_string(),
                timeout: self.connect_timeout,
            })?
            .map_err(|e| TransportError::ConnectFailed {
                target: target.to_string(),
                reason: e.to_string(),
            })?;

        info!(server = %target, "Websocket connected");

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        tokio::spawn(socket_task(stream, commands_rx, events_tx));

        Ok(TransportChannel {
            commands: commands_tx,
            events: events_rx,
        })
    }
}

async fn socket_task(
    stream: WsStream,
    mut commands: mpsc::UnboundedReceiver<TransportCommand>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let (mut ws_write, mut ws_read) = stream.split();
    let _ = events.send(TransportEvent::Opened);

    let terminal = loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(TransportCommand::Send(frame)) => {
                    if let Err(err) = ws_write.send(Message::Text(frame)).await {
                        warn!(error = %err, "Websocket write failed");
                        break TransportEvent::Error(err.to_string());
                    }
                }
                Some(TransportCommand::Close) | None => {
                    // Best effort; the peer may already be gone.
                    let _ = ws_write.send(Message::Close(None)).await;
                    break TransportEvent::Closed("closed locally".to_string());
                }
            },
            frame = ws_read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(TransportEvent::Message(text));
                }
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => {
                        let _ = events.send(TransportEvent::Message(text));
                    }
                    Err(_) => debug!("Dropping non UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| f.reason.to_string())
                        .filter(|reason| !reason.is_empty())
                        .unwrap_or_else(|| "closed by peer".to_string());
                    break TransportEvent::Closed(reason);
                }
                // Pings are answered by tungstenite itself.
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!(error = %err, "Websocket read failed");
                    break TransportEvent::Error(err.to_string());
                }
                None => break TransportEvent::Closed("stream ended".to_string()),
            },
        }
    };

    debug!(event = ?terminal, "Websocket task finished");
    let _ = events.send(terminal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn refused_connection_is_connect_failed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = WebSocketTransport::new(Duration::from_secs(2));
        let target = ServerAddress::parse(&format!("127.0.0.1:{port}"), 8765).unwrap();

        let result = transport.connect(&target).await;

        assert!(matches!(result, Err(TransportError::ConnectFailed { .. })));
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        // Accepts TCP through the backlog but never answers the handshake.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let transport = WebSocketTransport::new(Duration::from_millis(200));
        let target = ServerAddress::parse(&format!("127.0.0.1:{port}"), 8765).unwrap();

        let result = transport.connect(&target).await;

        assert!(matches!(result, Err(TransportError::ConnectTimeout { .. })));
        drop(listener);
    }
}
