//! Selection handling.
//!
//! Pointer positions are resolved against the last layout snapshot. A press
//! that lands nowhere (nothing laid out yet) is ignored. Pointer input only
//! carries paragraph granularity; character precision arrives separately
//! through `SelectKind::Chars` from the paragraph that owns input focus.

use super::{DispatchResult, accepts};
use crate::SelectKind;
use core_model::EditorModel;
use core_state::{InputInterest, Position, SelectionPhase};

pub(crate) fn handle_select(kind: SelectKind, model: &mut EditorModel) -> DispatchResult {
    match kind {
        SelectKind::Press { at, extend } => {
            let Some(pos) = model.hit_test(at) else {
                tracing::debug!(target: "actions.dispatch", "press outside layout");
                return DispatchResult::clean();
            };
            if !accepts(model.state(), pos, InputInterest::POINTER) {
                return DispatchResult::clean();
            }
            model.edit(|s| s.pointer_press(pos, None, extend));
            tracing::trace!(target: "actions.dispatch", op = "press", page = pos.page, extend, "select");
            DispatchResult::dirty()
        }
        SelectKind::Move { at } => {
            if model.state().selection_phase() != SelectionPhase::Dragging {
                return DispatchResult::clean();
            }
            let Some(pos) = model.hit_test(at) else {
                return DispatchResult::clean();
            };
            model.edit(|s| s.pointer_move(pos, None));
            DispatchResult::dirty()
        }
        SelectKind::Release => {
            if model.state().selection_phase() != SelectionPhase::Dragging {
                return DispatchResult::clean();
            }
            model.edit(|s| s.pointer_release());
            tracing::trace!(target: "actions.dispatch", op = "release", "select");
            DispatchResult::dirty()
        }
        SelectKind::Chars {
            page,
            paragraph,
            start,
            end,
        } => {
            let pos = Position::new(page, paragraph);
            if !accepts(model.state(), pos, InputInterest::KEY) {
                return DispatchResult::clean();
            }
            model.edit(|s| s.select_chars(pos, start, end));
            DispatchResult::dirty()
        }
        SelectKind::All => {
            model.edit(|s| s.select_all());
            tracing::trace!(target: "actions.dispatch", op = "select_all", "select");
            DispatchResult::dirty()
        }
    }
}
