use std::sync::{Arc, Mutex};

use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat};
use cs_core::{ClipboardAccessError, ClipboardProviderPort};
use tracing::debug;

/// Text clipboard of the current desktop session.
pub struct SystemClipboard {
    inner: Arc<Mutex<ClipboardContext>>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardAccessError> {
        let context = ClipboardContext::new()
            .map_err(|e| ClipboardAccessError::Unavailable(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(context)),
        })
    }
}

impl ClipboardProviderPort for SystemClipboard {
    fn read(&self) -> Result<Option<String>, ClipboardAccessError> {
        let ctx = self
            .inner
            .lock()
            .map_err(|_| ClipboardAccessError::Read("clipboard lock poisoned".to_string()))?;

        if !ctx.has(ContentFormat::Text) {
            return Ok(None);
        }

        let text = ctx
            .get_text()
            .map_err(|e| ClipboardAccessError::Read(e.to_string()))?;
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }

    fn write(&self, text: &str) -> Result<(), ClipboardAccessError> {
        let ctx = self
            .inner
            .lock()
            .map_err(|_| ClipboardAccessError::Write("clipboard lock poisoned".to_string()))?;

        ctx.set_text(text.to_string())
            .map_err(|e| ClipboardAccessError::Write(e.to_string()))?;
        debug!(bytes = text.len(), "System clipboard written");
        Ok(())
    }
}
