//! Port interfaces for the sync engine
//!
//! Ports define the contract between the engine (use cases in `cs-app`) and
//! the platform adapters in `cs-platform`. The engine only ever talks to the
//! outside world through these traits, which keeps it testable with in-memory
//! doubles.

mod clipboard;
pub mod errors;
mod status_sink;
mod transport;

pub use clipboard::ClipboardProviderPort;
pub use errors::{ClipboardAccessError, ConfigurationError, SessionError, TransportError};
pub use status_sink::StatusSinkPort;
pub use transport::{TransportChannel, TransportPort};
