//! In-memory port doubles shared by the sync use case tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cs_core::{
    ClipboardAccessError, ClipboardProviderPort, ConnectionStatus, EndpointTag, ServerAddress,
    StatusSinkPort, TransportChannel, TransportCommand, TransportError, TransportEvent,
    TransportPort, DEFAULT_PORT,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

pub(crate) fn tag(value: &str) -> EndpointTag {
    EndpointTag::new(value).expect("valid tag")
}

pub(crate) fn target() -> ServerAddress {
    ServerAddress::parse("127.0.0.1", DEFAULT_PORT).expect("valid address")
}

#[derive(Default)]
pub(crate) struct MockClipboard {
    content: Mutex<Option<String>>,
    writes: Mutex<Vec<String>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockClipboard {
    pub(crate) fn with_content(text: &str) -> Arc<Self> {
        let clipboard = Self::default();
        clipboard.set(text);
        Arc::new(clipboard)
    }

    pub(crate) fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Simulate the user copying `text`.
    pub(crate) fn set(&self, text: &str) {
        *self.content.lock().expect("content lock") = Some(text.to_string());
    }

    pub(crate) fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("writes lock").clone()
    }

    pub(crate) fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl ClipboardProviderPort for MockClipboard {
    fn read(&self) -> Result<Option<String>, ClipboardAccessError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClipboardAccessError::Read("mock read failure".to_string()));
        }
        Ok(self.content.lock().expect("content lock").clone())
    }

    fn write(&self, text: &str) -> Result<(), ClipboardAccessError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClipboardAccessError::Write("mock write failure".to_string()));
        }
        self.writes
            .lock()
            .expect("writes lock")
            .push(text.to_string());
        self.set(text);
        Ok(())
    }
}

/// Peer side of one mock connection.
pub(crate) struct PeerLink {
    commands: mpsc::UnboundedReceiver<TransportCommand>,
    events: mpsc::UnboundedSender<TransportEvent>,
}

impl PeerLink {
    pub(crate) async fn next_command(&mut self) -> Option<TransportCommand> {
        self.commands.recv().await
    }

    /// Next frame the engine sent, skipping control commands.
    pub(crate) async fn next_sent(&mut self) -> Option<String> {
        while let Some(command) = self.commands.recv().await {
            if let TransportCommand::Send(frame) = command {
                return Some(frame);
            }
        }
        None
    }

    /// Frames already queued by the engine, without waiting.
    pub(crate) fn drain_sent(&mut self) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(command) = self.commands.try_recv() {
            if let TransportCommand::Send(frame) = command {
                frames.push(frame);
            }
        }
        frames
    }

    pub(crate) fn deliver(&self, frame: &str) {
        let _ = self.events.send(TransportEvent::Message(frame.to_string()));
    }

    pub(crate) fn close(&self, reason: &str) {
        let _ = self.events.send(TransportEvent::Closed(reason.to_string()));
    }
}

pub(crate) struct MockTransport {
    peers: mpsc::UnboundedSender<PeerLink>,
    refusals: AtomicUsize,
    refuse_all: AtomicBool,
    attempts: Mutex<Vec<Instant>>,
}

impl MockTransport {
    pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PeerLink>) {
        let (peers, peers_rx) = mpsc::unbounded_channel();
        let transport = Self {
            peers,
            refusals: AtomicUsize::new(0),
            refuse_all: AtomicBool::new(false),
            attempts: Mutex::new(Vec::new()),
        };
        (Arc::new(transport), peers_rx)
    }

    pub(crate) fn refuse_next(&self, count: usize) {
        self.refusals.fetch_add(count, Ordering::SeqCst);
    }

    pub(crate) fn refuse_all(&self, refuse: bool) {
        self.refuse_all.store(refuse, Ordering::SeqCst);
    }

    pub(crate) fn attempt_count(&self) -> usize {
        self.attempts.lock().expect("attempts lock").len()
    }

    pub(crate) fn attempt_times(&self) -> Vec<Instant> {
        self.attempts.lock().expect("attempts lock").clone()
    }
}

#[async_trait]
impl TransportPort for MockTransport {
    async fn connect(&self, target: &ServerAddress) -> Result<TransportChannel, TransportError> {
        self.attempts
            .lock()
            .expect("attempts lock")
            .push(Instant::now());

        let refused = self.refuse_all.load(Ordering::SeqCst)
            || self
                .refusals
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
        if refused {
            return Err(TransportError::ConnectFailed {
                target: target.to_string(),
                reason: "mock refusal".to_string(),
            });
        }

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let _ = events_tx.send(TransportEvent::Opened);
        let _ = self.peers.send(PeerLink {
            commands: commands_rx,
            events: events_tx,
        });

        Ok(TransportChannel {
            commands: commands_tx,
            events: events_rx,
        })
    }
}

#[derive(Default)]
pub(crate) struct RecordingStatusSink {
    transitions: Mutex<Vec<(ConnectionStatus, String)>>,
}

impl RecordingStatusSink {
    pub(crate) fn statuses(&self) -> Vec<ConnectionStatus> {
        self.transitions
            .lock()
            .expect("transitions lock")
            .iter()
            .map(|(status, _)| *status)
            .collect()
    }
}

impl StatusSinkPort for RecordingStatusSink {
    fn on_status_change(&self, status: ConnectionStatus, detail: &str) {
        self.transitions
            .lock()
            .expect("transitions lock")
            .push((status, detail.to_string()));
    }
}
