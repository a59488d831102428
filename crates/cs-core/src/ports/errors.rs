use std::time::Duration;

use thiserror::Error;

/// Network transport failures. Always recovered by reconnecting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection refused by {target}: {reason}")]
    ConnectFailed { target: String, reason: String },

    #[error("connect to {target} timed out after {timeout:?}")]
    ConnectTimeout { target: String, timeout: Duration },

    #[error("connection closed")]
    ConnectionClosed,
}

/// Clipboard provider failures. Logged and skipped for that tick only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClipboardAccessError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read clipboard: {0}")]
    Read(String),

    #[error("failed to write clipboard: {0}")]
    Write(String),
}

/// Invalid engine configuration. Surfaced before any connection attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("server address is empty")]
    EmptyAddress,

    #[error("invalid server address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("unsupported scheme `{0}`, expected ws or wss")]
    UnsupportedScheme(String),

    #[error("invalid port {0}")]
    InvalidPort(i64),

    #[error("endpoint tag is empty")]
    EmptyEndpointTag,

    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
}

/// Sync session failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("not connected")]
    NotConnected,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to encode message: {0}")]
    Encode(String),
}
