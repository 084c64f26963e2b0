//! Copy / cut / paste.
//!
//! Clipboard failures and empty clipboard text leave the document
//! untouched. Paste replaces a selection only after the clipboard text is
//! known to be non-empty; cut deletes only after the text was stored.

use super::DispatchResult;
use crate::{Clipboard, ClipboardOp};
use core_model::EditorModel;

pub(crate) fn handle_clipboard(
    op: ClipboardOp,
    model: &mut EditorModel,
    clipboard: &mut dyn Clipboard,
) -> DispatchResult {
    match op {
        ClipboardOp::Copy => {
            store_selection(model, clipboard);
            DispatchResult::clean()
        }
        ClipboardOp::Cut => {
            if !store_selection(model, clipboard) {
                return DispatchResult::clean();
            }
            model.edit(|s| s.delete_selection());
            DispatchResult::dirty()
        }
        ClipboardOp::Paste => {
            let text = match clipboard.get_text() {
                Ok(Some(text)) if !text.is_empty() => text,
                Ok(_) => {
                    tracing::debug!(target: "actions.dispatch", op = "paste", "clipboard empty");
                    return DispatchResult::clean();
                }
                Err(e) => {
                    tracing::warn!(target: "actions.dispatch", op = "paste", error = %e, "clipboard read failed");
                    return DispatchResult::clean();
                }
            };
            model.edit(|s| s.insert_text(&text));
            tracing::trace!(target: "actions.dispatch", op = "paste", len = text.len(), "clipboard");
            DispatchResult::dirty()
        }
    }
}

/// Write the selected text to the clipboard. False when there is nothing
/// selected or the write failed.
fn store_selection(model: &EditorModel, clipboard: &mut dyn Clipboard) -> bool {
    let state = model.state();
    if !state.has_selection() {
        return false;
    }
    let text = state.selected_text();
    match clipboard.set_text(&text) {
        Ok(()) => {
            tracing::trace!(target: "actions.dispatch", op = "copy", len = text.len(), "clipboard");
            true
        }
        Err(e) => {
            tracing::warn!(target: "actions.dispatch", op = "copy", error = %e, "clipboard write failed");
            false
        }
    }
}
