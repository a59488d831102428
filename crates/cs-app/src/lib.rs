//! clipsync synchronization engine
//!
//! This crate contains the sync use cases (change detection, session,
//! reconnection, coordination) and the engine handle that runs them.

pub mod engine;
pub mod state;
pub mod usecases;

pub use engine::{
    EngineConfig, SyncEngine, SyncEngineHandle, DEFAULT_CONNECT_TIMEOUT, DEFAULT_POLL_INTERVAL,
    DEFAULT_RECONNECT_DELAY,
};
pub use state::{SharedSyncState, SyncState};
pub use usecases::sync::{
    ChangeDetector, ReconnectScheduler, ReconnectStats, ReconnectionController, SendSlot,
    SessionEvent, SessionEvents, SyncCoordinator, SyncSession,
};
