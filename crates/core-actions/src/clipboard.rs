//! Clipboard capability.
//!
//! The platform clipboard belongs to the host. The core only needs text in
//! and text out, and treats every failure as an empty result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable")]
    Unavailable,
    #[error("clipboard backend error: {0}")]
    Backend(String),
}

/// Text access to the host clipboard.
///
/// Calls are synchronous. Every edit runs on the single event-loop thread,
/// so a host with an async clipboard resolves the request before dispatching
/// the action (or reports `Unavailable`) rather than suspending mid-edit.
pub trait Clipboard {
    /// Current clipboard text; `Ok(None)` when it holds no text.
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard used by the headless driver and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard that always fails, for hosts without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError> {
        Err(ClipboardError::Unavailable)
    }

    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trips_text() {
        let mut cb = MemoryClipboard::new();
        assert_eq!(cb.get_text().unwrap(), None);
        cb.set_text("abc").unwrap();
        assert_eq!(cb.contents(), Some("abc"));
    }

    #[test]
    fn unavailable_clipboard_reports_error() {
        let mut cb = UnavailableClipboard;
        assert!(matches!(cb.get_text(), Err(ClipboardError::Unavailable)));
        assert_eq!(
            cb.set_text("x").unwrap_err().to_string(),
            "clipboard unavailable"
        );
    }
}
