//! Formatting commands.
//!
//! Each command updates the pending style (used for subsequently typed text)
//! and, when paragraphs hold a selection, applies only the changed attribute
//! to the selected ranges. Selections survive so consecutive commands hit the
//! same text.

use crate::DocumentState;
use core_text::{Alignment, Color, Style};
use tracing::debug;

impl DocumentState {
    pub fn toggle_bold(&mut self) {
        let on = !self.pending_style.is_bold();
        self.set_bold(on);
    }

    pub fn toggle_italic(&mut self) {
        let on = !self.pending_style.is_italic();
        self.set_italic(on);
    }

    pub fn toggle_underline(&mut self) {
        let on = !self.pending_style.underline;
        self.set_underline(on);
    }

    pub fn toggle_strikethrough(&mut self) {
        let on = !self.pending_style.strikethrough;
        self.set_strikethrough(on);
    }

    pub fn set_bold(&mut self, on: bool) {
        self.pending_style.set_bold(on);
        self.format_selection("bold", |s| s.set_bold(on));
    }

    pub fn set_italic(&mut self, on: bool) {
        self.pending_style.set_italic(on);
        self.format_selection("italic", |s| s.set_italic(on));
    }

    pub fn set_underline(&mut self, on: bool) {
        self.pending_style.underline = on;
        self.format_selection("underline", |s| s.underline = on);
    }

    pub fn set_strikethrough(&mut self, on: bool) {
        self.pending_style.strikethrough = on;
        self.format_selection("strikethrough", |s| s.strikethrough = on);
    }

    pub fn set_foreground(&mut self, color: Color) {
        self.pending_style.foreground = color;
        self.format_selection("foreground", |s| s.foreground = color);
    }

    /// `None` (or a transparent color) clears the background.
    pub fn set_background(&mut self, color: Option<Color>) {
        let color = color.filter(|c| !c.is_transparent());
        self.pending_style.background = color;
        self.format_selection("background", |s| s.background = color);
    }

    pub fn set_font_family(&mut self, family: &str) {
        let family = family.trim();
        if family.is_empty() {
            return;
        }
        self.pending_style.font_family = family.to_string();
        self.format_selection("font_family", |s| s.font_family = family.to_string());
    }

    /// Non-finite or non-positive sizes are ignored.
    pub fn set_font_size(&mut self, size: f64) {
        if !(size.is_finite() && size > 0.0) {
            debug!(target: "state.format", "ignored invalid font size");
            return;
        }
        self.pending_style.set_font_size(size);
        self.format_selection("font_size", |s| s.set_font_size(size));
    }

    /// Set the pending alignment, the current paragraph's alignment and that
    /// of every paragraph holding a selection.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.revalidate();
        self.pending_alignment = alignment;
        self.current_paragraph_mut().alignment = alignment;
        let mut changed = 1usize;
        for page in self.pages.iter_mut() {
            for para in page.paragraphs_mut() {
                if para.has_selection() {
                    para.alignment = alignment;
                    changed += 1;
                }
            }
        }
        debug!(target: "state.format", ?alignment, paragraphs = changed, "set_alignment");
    }

    fn format_selection<F: Fn(&mut Style)>(&mut self, attr: &'static str, mutate: F) {
        self.revalidate();
        let mut formatted = 0usize;
        let mut pages = Vec::new();
        for (pi, page) in self.pages.iter_mut().enumerate() {
            let mut hit = false;
            for para in page.paragraphs_mut() {
                if let Some((start, end)) = para.selection() {
                    para.apply_format(start, end, &mutate);
                    formatted += 1;
                    hit = true;
                }
            }
            if hit {
                pages.push(pi);
            }
        }
        for pi in pages {
            self.mark_grown(pi);
        }
        debug!(target: "state.format", attr, paragraphs = formatted, "format_selection");
    }
}
