use super::DispatchResult;
use crate::FormatKind;
use core_model::EditorModel;

pub(crate) fn handle_format(kind: FormatKind, model: &mut EditorModel) -> DispatchResult {
    let selected = model.state().has_selection();
    let aligns = matches!(kind, FormatKind::SetAlignment(_));
    model.edit(|s| match kind {
        FormatKind::ToggleBold => s.toggle_bold(),
        FormatKind::ToggleItalic => s.toggle_italic(),
        FormatKind::ToggleUnderline => s.toggle_underline(),
        FormatKind::ToggleStrikethrough => s.toggle_strikethrough(),
        FormatKind::SetForeground(c) => s.set_foreground(c),
        FormatKind::SetBackground(c) => s.set_background(c),
        FormatKind::SetFontFamily(family) => s.set_font_family(&family),
        FormatKind::SetFontSize(size) => s.set_font_size(size),
        FormatKind::SetAlignment(a) => s.set_alignment(a),
    });
    tracing::trace!(target: "actions.dispatch", op = "format", selected, "format");
    // a pending-style change alone has nothing to redraw
    if selected || aligns {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
