/// Number of characters of clipboard content that may appear in logs.
pub const PREVIEW_CHARS: usize = 50;

/// Shorten clipboard text for log output.
///
/// The payload itself is never truncated; this only bounds what ends up in
/// log lines. Counting is done on `char`s so multi-byte text is never split.
pub fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
