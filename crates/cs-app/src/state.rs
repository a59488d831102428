//! Shared engine state.
//!
//! The clipboard snapshot and the connection status share one mutex. The
//! detector tick and the remote-apply path both run under it, which is what
//! orders a remote clipboard write before the next tick observes the
//! suppression window. Network sends never happen while it is held.

use std::sync::Arc;

use cs_core::{ClipboardSnapshot, ConnectionStatus};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct SyncState {
    pub snapshot: ClipboardSnapshot,
    pub status: ConnectionStatus,
}

pub type SharedSyncState = Arc<Mutex<SyncState>>;

pub fn new_shared_state() -> SharedSyncState {
    Arc::new(Mutex::new(SyncState::default()))
}
