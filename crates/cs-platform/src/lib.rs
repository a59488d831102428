//! # cs-platform
//!
//! Platform implementations of the clipsync ports.
//!
//! This crate contains the adapters that talk to the operating system
//! clipboard and to the network, plus status sinks for embedding callers.

pub mod clipboard;
pub mod status;
pub mod transport;

pub use clipboard::SystemClipboard;
pub use status::{ChannelStatusSink, FanoutStatusSink, StatusUpdate, TracingStatusSink};
pub use transport::WebSocketTransport;
