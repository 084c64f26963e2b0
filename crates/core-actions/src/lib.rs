//! Action vocabulary, key translation and dispatch.
//!
//! Host input (`core_events::InputEvent` / `CommandEvent`) is translated into
//! an `Action`, then `dispatch` applies it to an `EditorModel` through the
//! model's edit phase. Layout passes are not run here; the runtime drives
//! them when the host reports `Event::LayoutReady`.

use core_model::Point;
use core_text::{Alignment, Color};

pub mod clipboard;
pub mod dispatcher;
pub mod key_translator;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, UnavailableClipboard};
pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::{translate_command, translate_input, translate_key};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Edit(EditKind),
    Format(FormatKind),
    Select(SelectKind),
    Clipboard(ClipboardOp),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    /// Committed text; line separators open new paragraphs.
    InsertText(String),
    InsertParagraph,
    Backspace,
    DeleteForward,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormatKind {
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ToggleStrikethrough,
    SetForeground(Color),
    SetBackground(Option<Color>),
    SetFontFamily(String),
    SetFontSize(f64),
    SetAlignment(Alignment),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectKind {
    /// Pointer pressed at a canvas point; `extend` is shift-click.
    Press { at: Point, extend: bool },
    Move { at: Point },
    Release,
    /// Character range reported by the host for one paragraph.
    Chars {
        page: usize,
        paragraph: usize,
        start: usize,
        end: usize,
    },
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
    Copy,
    Cut,
    Paste,
}

impl Action {
    /// Short label for logs. Never includes document text.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Edit(EditKind::InsertText(_)) => "insert_text",
            Action::Edit(EditKind::InsertParagraph) => "insert_paragraph",
            Action::Edit(EditKind::Backspace) => "backspace",
            Action::Edit(EditKind::DeleteForward) => "delete_forward",
            Action::Format(_) => "format",
            Action::Select(_) => "select",
            Action::Clipboard(ClipboardOp::Copy) => "copy",
            Action::Clipboard(ClipboardOp::Cut) => "cut",
            Action::Clipboard(ClipboardOp::Paste) => "paste",
            Action::Quit => "quit",
        }
    }
}

/// Observer notified before each action is dispatched.
pub trait ActionObserver {
    fn on_action(&self, action: &Action);
}
