//! A span of text sharing one attribute set.

use crate::{Style, char_len};

/// Run text never contains line separators; multi-line input is split into
/// paragraphs before it reaches run storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub style: Style,
}

impl Run {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Empty run used as a paragraph's sole placeholder.
    pub fn placeholder(style: Style) -> Self {
        Self {
            text: String::new(),
            style,
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Copy of this run's style with different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: self.style.clone(),
        }
    }
}
