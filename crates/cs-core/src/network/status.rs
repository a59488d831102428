use std::fmt;

/// Connection status of a sync engine.
///
/// ```text
/// Connecting ──→ Connected ──→ Connecting ──→ ...
///      │                            │
///      └──────→ Disconnected ←──────┘   (only on explicit stop)
/// ```
///
/// `Disconnected` is terminal. Only `Connected` enables outbound sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::Connecting
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
