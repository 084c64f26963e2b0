//! Dispatcher applying `Action` to an `EditorModel`.
//!
//! Sub-modules:
//! * `edit`      - text insertion and deletion at the caret
//! * `format`    - pending style / selection formatting
//! * `select`    - pointer drag, host character selection, select all
//! * `clipboard` - copy / cut / paste through the `Clipboard` capability
//!
//! Every mutation goes through `EditorModel::edit`, which queues the
//! deferred overflow checks. Keyboard and text input is delivered only if
//! the current paragraph's subscription accepts it.

use crate::{Action, ActionObserver, Clipboard};
use core_model::EditorModel;
use core_state::{DocumentState, InputInterest, Position};

mod clipboard;
mod edit;
mod format;
mod select;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// The document or selection changed; the host should re-render.
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }
}

pub fn dispatch(
    action: Action,
    model: &mut EditorModel,
    clipboard: &mut dyn Clipboard,
    observers: &[Box<dyn ActionObserver>],
) -> DispatchResult {
    for obs in observers {
        obs.on_action(&action);
    }
    tracing::trace!(target: "actions.dispatch", action = action.label(), "dispatch");

    match action {
        Action::Edit(kind) => edit::handle_edit(kind, model),
        Action::Format(kind) => format::handle_format(kind, model),
        Action::Select(kind) => select::handle_select(kind, model),
        Action::Clipboard(op) => clipboard::handle_clipboard(op, model, clipboard),
        Action::Quit => DispatchResult::quit(),
    }
}

/// True when the paragraph at `pos` (clamped into its page) is subscribed
/// to `kind`.
pub(crate) fn accepts(state: &DocumentState, pos: Position, kind: InputInterest) -> bool {
    let Some(page) = state.page(pos.page) else {
        return false;
    };
    page.paragraph(page.clamp_paragraph(pos.paragraph))
        .is_some_and(|p| state.route(p.id(), kind).is_some())
}
