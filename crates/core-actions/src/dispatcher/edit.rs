//! Text edit handling (insert/paragraph/backspace/delete).

use super::{DispatchResult, accepts};
use crate::EditKind;
use core_model::EditorModel;
use core_state::InputInterest;

pub(crate) fn handle_edit(kind: EditKind, model: &mut EditorModel) -> DispatchResult {
    let interest = match kind {
        EditKind::InsertText(_) => InputInterest::TEXT,
        _ => InputInterest::KEY,
    };
    let state = model.state();
    if !accepts(state, state.current(), interest) {
        tracing::debug!(target: "actions.dispatch", ?interest, "input not routed");
        return DispatchResult::clean();
    }
    let before = model.state().current();
    match kind {
        EditKind::InsertText(text) => {
            model.edit(|s| s.insert_text(&text));
            tracing::trace!(target: "actions.dispatch", op = "insert_text", len = text.len(), page = before.page, paragraph = before.paragraph, "edit");
        }
        EditKind::InsertParagraph => {
            model.edit(|s| s.insert_paragraph());
            tracing::trace!(target: "actions.dispatch", op = "insert_paragraph", page = before.page, paragraph = before.paragraph, "edit");
        }
        EditKind::Backspace => {
            model.edit(|s| s.backspace());
            tracing::trace!(target: "actions.dispatch", op = "backspace", page = before.page, paragraph = before.paragraph, "edit");
        }
        EditKind::DeleteForward => {
            if !model.state().has_selection() {
                return DispatchResult::clean();
            }
            model.edit(|s| s.delete_forward());
            tracing::trace!(target: "actions.dispatch", op = "delete_forward", page = before.page, paragraph = before.paragraph, "edit");
        }
    }
    DispatchResult::dirty()
}
