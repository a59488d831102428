use serde::{Deserialize, Serialize};

use super::EndpointTag;

/// Source tag assumed when an inbound frame carries none.
const UNKNOWN_SOURCE: &str = "unknown";

/// Value of the `type` field of a wire frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Clipboard,
    /// Any type this endpoint does not understand (e.g. `"ping"`).
    #[serde(other)]
    Unknown,
}

/// One wire frame.
///
/// ```json
/// { "type": "clipboard", "content": "<text>", "source": "<endpoint-tag>" }
/// ```
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMessage {
    #[serde(rename = "type")]
    kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default = "unknown_source")]
    source: String,
}

fn unknown_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

impl SyncMessage {
    /// Build an outbound clipboard message tagged with `source`.
    pub fn clipboard(content: impl Into<String>, source: &EndpointTag) -> Self {
        Self {
            kind: MessageKind::Clipboard,
            content: Some(content.into()),
            source: source.as_str().to_string(),
        }
    }

    /// Parse one inbound frame.
    ///
    /// Frames of unknown type parse successfully; callers decide what to do
    /// with them via [`SyncMessage::into_clipboard_content`].
    pub fn decode(frame: &str) -> serde_json::Result<Self> {
        serde_json::from_str(frame)
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The clipboard text, if this is a well-formed clipboard message.
    pub fn into_clipboard_content(self) -> Option<String> {
        match self.kind {
            MessageKind::Clipboard => self.content,
            MessageKind::Unknown => None,
        }
    }
}
