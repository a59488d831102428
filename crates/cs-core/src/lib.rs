//! # cs-core
//!
//! Core domain models and ports for clipsync.
//!
//! This crate contains pure domain types and the port traits the sync engine
//! is written against. It has no platform or network dependencies.

pub mod clipboard;
pub mod config;
pub mod network;
pub mod ports;

// Re-export commonly used types at the crate root
pub use clipboard::{preview, ClipboardSnapshot, TickOutcome};
pub use config::AppConfig;
pub use network::{
    ConnectionStatus, EndpointTag, MessageKind, ServerAddress, SyncMessage, TransportCommand,
    TransportEvent, DEFAULT_PORT,
};
pub use ports::{
    ClipboardAccessError, ClipboardProviderPort, ConfigurationError, SessionError,
    StatusSinkPort, TransportChannel, TransportError, TransportPort,
};
