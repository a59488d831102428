//! Clipboard synchronization use cases.
//!
//! ```text
//! ChangeDetector ──LocalChange──→ SyncCoordinator ──send──→ SyncSession ──→ peer
//!                                       ↑                        │
//!                                 RemoteChange                   │
//!                                       │                        ↓
//!                              ReconnectionController ←──── SessionEvents
//! ```

mod change_detector;
mod coordinator;
mod reconnect;
mod session;

pub use change_detector::ChangeDetector;
pub use coordinator::SyncCoordinator;
pub use reconnect::{ReconnectScheduler, ReconnectStats, ReconnectionController};
pub use session::{SendSlot, SessionEvent, SessionEvents, SyncSession};

#[cfg(test)]
pub(crate) mod test_support;
