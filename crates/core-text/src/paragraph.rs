//! Paragraph: an ordered run list plus alignment and per-paragraph selection.
//!
//! Selection is stored as a raw `(start, end)` pair that is not pre-ordered
//! and may use `SELECTION_END` as an unbounded upper sentinel ("to the end of
//! the paragraph"). Consumers read it through `selection()`, which orders and
//! clamps against the current length.
//!
//! Two slots exist: the *live* selection (what an input widget would report
//! while it has focus) and the *saved* selection committed when a drag ends.
//! The saved slot survives focus moving to another paragraph.

use crate::format;
use crate::{Alignment, Run, Style};
use std::sync::atomic::{AtomicU64, Ordering};

/// Upper-bound sentinel meaning "through the end of the paragraph".
pub const SELECTION_END: usize = usize::MAX;

static NEXT_PARAGRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a paragraph, unchanged by migration between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParagraphId(u64);

impl ParagraphId {
    fn next() -> Self {
        Self(NEXT_PARAGRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct Paragraph {
    id: ParagraphId,
    runs: Vec<Run>,
    pub alignment: Alignment,
    selection: Option<(usize, usize)>,
    saved_selection: Option<(usize, usize)>,
}

impl Paragraph {
    /// Empty paragraph holding one placeholder run in `style`.
    pub fn new(style: Style, alignment: Alignment) -> Self {
        Self {
            id: ParagraphId::next(),
            runs: vec![Run::placeholder(style)],
            alignment,
            selection: None,
            saved_selection: None,
        }
    }

    /// Paragraph holding `text` (no line separators) as a single run.
    pub fn with_text(text: &str, style: Style, alignment: Alignment) -> Self {
        debug_assert!(!text.contains(['\n', '\r']));
        let mut p = Self::new(style.clone(), alignment);
        p.append_text(text, &style);
        p
    }

    pub fn id(&self) -> ParagraphId {
        self.id
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Length in characters of the logical text.
    pub fn len(&self) -> usize {
        format::runs_len(&self.runs)
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    pub fn text(&self) -> String {
        format::runs_text(&self.runs)
    }

    /// Style of the trailing run (used for caret height and measurement).
    pub fn trailing_style(&self) -> Option<&Style> {
        self.runs.last().map(|r| &r.style)
    }

    // --- selection -------------------------------------------------------

    /// Effective selection: the saved range if any, else the live one,
    /// ordered and clamped. Empty ranges are reported as `None`.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let (a, b) = self.saved_selection.or(self.selection)?;
        let (start, end) = format::clamp_range(self.len(), a, b);
        (start < end).then_some((start, end))
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_some()
    }

    /// Raw live selection as last set (unordered, may hold the sentinel).
    pub fn live_selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    pub fn saved_selection(&self) -> Option<(usize, usize)> {
        self.saved_selection
    }

    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = Some((start, end));
    }

    /// Select the whole paragraph.
    pub fn select_all(&mut self) {
        self.selection = Some((0, SELECTION_END));
    }

    /// Copy the live selection into the saved slot.
    pub fn commit_selection(&mut self) {
        self.saved_selection = self.selection;
    }

    pub fn clear_saved_selection(&mut self) {
        self.saved_selection = None;
    }

    /// Drop both live and saved selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.saved_selection = None;
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?;
        Some(format::slice_text(&self.runs, start, end))
    }

    // --- run mutation ----------------------------------------------------

    pub fn append_text(&mut self, text: &str, style: &Style) {
        format::append_text(&mut self.runs, text, style);
    }

    pub fn insert_text(&mut self, offset: usize, text: &str, style: &Style) {
        format::insert_text(&mut self.runs, offset, text, style);
    }

    pub fn apply_format<F: Fn(&mut Style)>(&mut self, start: usize, end: usize, mutate: F) {
        format::apply_format(&mut self.runs, start, end, mutate);
    }

    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        format::delete_range(&mut self.runs, start, end)
    }

    /// Delete the effective selection, clearing it. Returns the removed text.
    pub fn delete_selection(&mut self) -> Option<String> {
        let (start, end) = self.selection()?;
        let removed = self.delete_range(start, end);
        self.clear_selection();
        Some(removed)
    }

    pub fn remove_last_grapheme(&mut self) -> Option<String> {
        format::remove_last_grapheme(&mut self.runs)
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        format::slice_text(&self.runs, start, end)
    }
}
