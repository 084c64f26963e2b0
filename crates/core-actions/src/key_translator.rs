//! Translation of host input into `Action`s.
//!
//! Shortcuts: Ctrl+B/I/U toggle bold/italic/underline, Ctrl+A selects all,
//! Ctrl+C/X/V copy/cut/paste. Enter, Backspace and Delete edit; Tab and
//! plain (or shifted) characters insert text. Navigation keys and Esc have no
//! action.

use crate::{Action, ClipboardOp, EditKind, FormatKind, SelectKind};
use core_events::{CommandEvent, InputEvent, KeyCode, KeyEvent, KeyModifiers, PointerKind};
use core_model::Point;
use tracing::trace;

pub fn translate_key(key: &KeyEvent) -> Option<Action> {
    if key.mods.contains(KeyModifiers::CTRL) {
        let KeyCode::Char(c) = key.code else {
            return None;
        };
        let action = match c.to_ascii_lowercase() {
            'b' => Action::Format(FormatKind::ToggleBold),
            'i' => Action::Format(FormatKind::ToggleItalic),
            'u' => Action::Format(FormatKind::ToggleUnderline),
            'a' => Action::Select(SelectKind::All),
            'c' => Action::Clipboard(ClipboardOp::Copy),
            'x' => Action::Clipboard(ClipboardOp::Cut),
            'v' => Action::Clipboard(ClipboardOp::Paste),
            _ => {
                trace!(target: "actions.translate", key = %key, "unmapped shortcut");
                return None;
            }
        };
        return Some(action);
    }
    if key.mods.contains(KeyModifiers::ALT) {
        return None;
    }
    match key.code {
        KeyCode::Char(c) => Some(Action::Edit(EditKind::InsertText(c.to_string()))),
        KeyCode::Tab => Some(Action::Edit(EditKind::InsertText("\t".into()))),
        KeyCode::Enter => Some(Action::Edit(EditKind::InsertParagraph)),
        KeyCode::Backspace => Some(Action::Edit(EditKind::Backspace)),
        KeyCode::Delete => Some(Action::Edit(EditKind::DeleteForward)),
        KeyCode::Esc | KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => None,
    }
}

pub fn translate_command(cmd: CommandEvent) -> Action {
    match cmd {
        CommandEvent::ToggleBold => Action::Format(FormatKind::ToggleBold),
        CommandEvent::ToggleItalic => Action::Format(FormatKind::ToggleItalic),
        CommandEvent::ToggleUnderline => Action::Format(FormatKind::ToggleUnderline),
        CommandEvent::ToggleStrikethrough => Action::Format(FormatKind::ToggleStrikethrough),
        CommandEvent::SetForeground(c) => Action::Format(FormatKind::SetForeground(c)),
        CommandEvent::SetBackground(c) => Action::Format(FormatKind::SetBackground(c)),
        CommandEvent::SetFontFamily(f) => Action::Format(FormatKind::SetFontFamily(f)),
        CommandEvent::SetFontSize(s) => Action::Format(FormatKind::SetFontSize(s)),
        CommandEvent::SetAlignment(a) => Action::Format(FormatKind::SetAlignment(a)),
        CommandEvent::SelectAll => Action::Select(SelectKind::All),
        CommandEvent::Copy => Action::Clipboard(ClipboardOp::Copy),
        CommandEvent::Cut => Action::Clipboard(ClipboardOp::Cut),
        CommandEvent::Paste => Action::Clipboard(ClipboardOp::Paste),
        CommandEvent::Quit => Action::Quit,
    }
}

pub fn translate_input(input: &InputEvent) -> Option<Action> {
    match input {
        InputEvent::Key(key) => translate_key(key),
        InputEvent::TextCommit(text) if text.is_empty() => None,
        InputEvent::TextCommit(text) => Some(Action::Edit(EditKind::InsertText(text.clone()))),
        InputEvent::Pointer(p) => {
            let at = Point::new(p.x, p.y);
            let kind = match p.kind {
                PointerKind::Press => SelectKind::Press {
                    at,
                    extend: p.mods.contains(KeyModifiers::SHIFT),
                },
                PointerKind::Move => SelectKind::Move { at },
                PointerKind::Release => SelectKind::Release,
            };
            Some(Action::Select(kind))
        }
        InputEvent::SelectChars {
            page,
            paragraph,
            start,
            end,
        } => Some(Action::Select(SelectKind::Chars {
            page: *page,
            paragraph: *paragraph,
            start: *start,
            end: *end,
        })),
    }
}
