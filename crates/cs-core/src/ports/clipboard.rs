use super::ClipboardAccessError;

/// Clipboard provider port - abstracts the system clipboard.
///
/// Calls are synchronous and a successful `write` is visible to the next
/// `read`. Implementations must be cheap enough to call from a polling loop.
pub trait ClipboardProviderPort: Send + Sync {
    /// Read the current clipboard text.
    ///
    /// Returns `Ok(None)` when the clipboard holds no text.
    fn read(&self) -> Result<Option<String>, ClipboardAccessError>;

    /// Replace the clipboard content with `text`.
    fn write(&self, text: &str) -> Result<(), ClipboardAccessError>;
}
