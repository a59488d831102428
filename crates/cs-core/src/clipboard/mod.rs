//! Clipboard domain models.

mod preview;
mod snapshot;

pub use preview::{preview, PREVIEW_CHARS};
pub use snapshot::{ClipboardSnapshot, TickOutcome};
