/// Last clipboard state this endpoint is aware of.
///
/// There is exactly one live snapshot per engine. It is mutated only by the
/// change detector (on read) and by the coordinator (on remote apply and on
/// the bootstrap push).
///
/// `originated_remotely` is the echo-suppression window: it is set by a remote
/// apply and cleared by the very next detector tick, whatever that tick sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    pub content: String,
    pub originated_remotely: bool,
}

/// Result of feeding one clipboard read into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was read (empty clipboard or failed read).
    NoContent,
    /// The clipboard still holds the last-known content.
    Unchanged,
    /// The content differs but the change was swallowed by the suppression window.
    Suppressed,
    /// A genuine local change.
    Changed(String),
}

impl ClipboardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one detector tick.
    ///
    /// The suppression flag is always consumed, so it never outlives a tick.
    pub fn observe(&mut self, current: Option<String>) -> TickOutcome {
        let suppressed = std::mem::take(&mut self.originated_remotely);

        let Some(current) = current else {
            return TickOutcome::NoContent;
        };

        if current == self.content {
            return TickOutcome::Unchanged;
        }

        self.content = current;
        if suppressed {
            TickOutcome::Suppressed
        } else {
            TickOutcome::Changed(self.content.clone())
        }
    }

    /// Open the suppression window for a remote write of `content`.
    ///
    /// Returns `false` (and leaves the snapshot untouched) when `content` is
    /// already the last-known content, in which case nothing must be written.
    pub fn begin_remote_apply(&mut self, content: &str) -> bool {
        if self.content == content {
            return false;
        }
        self.content = content.to_string();
        self.originated_remotely = true;
        true
    }

    /// Record content that was pushed to peers without going through a tick.
    pub fn record_pushed(&mut self, content: &str) {
        self.content = content.to_string();
    }
}
