//! Line-oriented logging helpers

/// Emit `text` as one log event per line so multi-line command output and
/// file contents stay readable in CI logs.
pub fn lines(text: &str) {
    for line in text.lines() {
        tracing::info!("{}", line);
    }
}

/// Same as [`lines`], at warn level
pub fn warn_lines(text: &str) {
    for line in text.lines() {
        tracing::warn!("{}", line);
    }
}
