use std::sync::Arc;
use std::time::Duration;

use cs_core::{
    preview, EndpointTag, ServerAddress, SessionError, SyncMessage, TransportCommand,
    TransportError, TransportEvent, TransportPort,
};
use tokio::sync::{mpsc, Mutex, MutexGuard};
use tracing::{debug, info, info_span, Instrument};

/// Events surfaced by a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A peer published new clipboard text.
    RemoteChange(String),
    /// The connection ended. Always the last event of a session stream.
    Closed(String),
}

/// One connection to a peer, speaking the clipboard wire protocol.
///
/// At most one connect attempt and at most one live link exist at any time:
/// attempts are serialized, and connecting replaces (and closes) any previous
/// link. Outbound frames leave in the order their send slots were reserved.
pub struct SyncSession {
    transport: Arc<dyn TransportPort>,
    endpoint_tag: EndpointTag,
    connect_timeout: Duration,
    attempt: Mutex<()>,
    outbound: Mutex<()>,
    link: Mutex<Option<mpsc::UnboundedSender<TransportCommand>>>,
    last_sent: Arc<Mutex<Option<String>>>,
}

impl SyncSession {
    pub fn new(
        transport: Arc<dyn TransportPort>,
        endpoint_tag: EndpointTag,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            endpoint_tag,
            connect_timeout,
            attempt: Mutex::new(()),
            outbound: Mutex::new(()),
            link: Mutex::new(None),
            last_sent: Arc::new(Mutex::new(None)),
        }
    }

    /// Open a connection to `target` and return its inbound event stream.
    pub async fn connect(&self, target: &ServerAddress) -> Result<SessionEvents, TransportError> {
        let span = info_span!("usecase.sync.session.connect", server = %target);

        async move {
            let _attempt = self.attempt.lock().await;
            self.disconnect().await;

            let channel = tokio::time::timeout(self.connect_timeout, self.transport.connect(target))
                .await
                .map_err(|_| TransportError::ConnectTimeout {
                    target: target.to_string(),
                    timeout: self.connect_timeout,
                })??;

            *self.link.lock().await = Some(channel.commands);
            info!("Session connected");

            Ok(SessionEvents {
                events: channel.events,
                endpoint_tag: self.endpoint_tag.clone(),
                last_sent: Arc::clone(&self.last_sent),
                finished: false,
            })
        }
        .instrument(span)
        .await
    }

    /// Send `text` to the peer as one clipboard frame.
    ///
    /// Fails with [`SessionError::NotConnected`] without transmitting anything
    /// when there is no live link.
    pub async fn send(&self, text: &str) -> Result<(), SessionError> {
        self.reserve_send().await.send(text).await
    }

    /// Take the next place in the outbound order without sending yet.
    ///
    /// Other senders wait until the returned slot is used or dropped.
    pub async fn reserve_send(&self) -> SendSlot<'_> {
        SendSlot {
            session: self,
            _order: self.outbound.lock().await,
        }
    }

    async fn transmit(&self, text: &str) -> Result<(), SessionError> {
        let frame = SyncMessage::clipboard(text, &self.endpoint_tag)
            .encode()
            .map_err(|e| SessionError::Encode(e.to_string()))?;

        {
            let link = self.link.lock().await;
            let Some(commands) = link.as_ref().filter(|tx| !tx.is_closed()) else {
                return Err(SessionError::NotConnected);
            };
            commands
                .send(TransportCommand::Send(frame))
                .map_err(|_| TransportError::ConnectionClosed)?;
        }

        *self.last_sent.lock().await = Some(text.to_string());
        debug!(preview = %preview(text), bytes = text.len(), "Clipboard frame sent");
        Ok(())
    }

    /// Close the live link, if any. Does not wait for in-flight frames.
    pub async fn disconnect(&self) {
        if let Some(commands) = self.link.lock().await.take() {
            // The socket task may already be gone; nothing to do then.
            let _ = commands.send(TransportCommand::Close);
            debug!("Session link closed");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.link
            .lock()
            .await
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }
}

/// A reserved place in a session's outbound order.
pub struct SendSlot<'a> {
    session: &'a SyncSession,
    _order: MutexGuard<'a, ()>,
}

impl SendSlot<'_> {
    /// Send `text` in this slot's place. Same failures as [`SyncSession::send`].
    pub async fn send(self, text: &str) -> Result<(), SessionError> {
        self.session.transmit(text).await
    }
}

/// Inbound event stream of one connection.
///
/// Yields `RemoteChange` for every accepted frame and exactly one terminal
/// `Closed`; after that, `next` returns `None`.
pub struct SessionEvents {
    events: mpsc::UnboundedReceiver<TransportEvent>,
    endpoint_tag: EndpointTag,
    last_sent: Arc<Mutex<Option<String>>>,
    finished: bool,
}

impl SessionEvents {
    pub async fn next(&mut self) -> Option<SessionEvent> {
        if self.finished {
            return None;
        }

        loop {
            let Some(event) = self.events.recv().await else {
                self.finished = true;
                return Some(SessionEvent::Closed("transport ended".to_string()));
            };

            match event {
                TransportEvent::Opened => continue,
                TransportEvent::Message(frame) => {
                    if let Some(content) = self.accept(&frame).await {
                        return Some(SessionEvent::RemoteChange(content));
                    }
                }
                TransportEvent::Closed(reason) => {
                    self.finished = true;
                    return Some(SessionEvent::Closed(reason));
                }
                TransportEvent::Error(reason) => {
                    self.finished = true;
                    return Some(SessionEvent::Closed(format!("transport error: {reason}")));
                }
            }
        }
    }

    /// Filter one inbound frame. Malformed frames are expected and dropped.
    async fn accept(&self, frame: &str) -> Option<String> {
        let message = match SyncMessage::decode(frame) {
            Ok(message) => message,
            Err(err) => {
                debug!(error = %err, "Dropping malformed frame");
                return None;
            }
        };

        if self.endpoint_tag.matches(message.source()) {
            debug!("Dropping frame tagged with our own endpoint tag");
            return None;
        }

        let kind = message.kind();
        let Some(content) = message.into_clipboard_content() else {
            debug!(kind = ?kind, "Dropping non-clipboard frame");
            return None;
        };

        if self.last_sent.lock().await.as_deref() == Some(content.as_str()) {
            debug!("Dropping echo of our last sent content");
            return None;
        }

        debug!(preview = %preview(&content), "Remote clipboard received");
        Some(content)
    }
}
