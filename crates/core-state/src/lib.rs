//! Document state: pages, current edit position, pending formatting and
//! selection.
//!
//! All mutation happens synchronously here (phase 1 of an edit). Pages whose
//! rendered height may have grown are recorded and handed to the layout
//! layer through `take_grown_pages`, which schedules the deferred overflow
//! check (phase 2). Because that deferred step can move paragraphs between
//! pages, every public entry point re-validates the current position before
//! using it.
//!
//! Pending style and alignment are explicit document fields. They change
//! only through formatting commands; moving the caret never re-derives them
//! from the text under it.

use core_text::{Alignment, Paragraph, ParagraphId, Style, grapheme};
use std::collections::BTreeSet;
use tracing::{debug, trace};

mod edit;
mod formatting;
pub mod page;
pub mod routing;
pub mod selection;

pub use page::Page;
pub use routing::{InputInterest, InputRoutes, Subscription};
pub use selection::{SelectionManager, SelectionPhase, SelectionPoint};

/// Default page-boundary marker used by `plain_text`.
pub const DEFAULT_PAGE_MARKER: &str = "\n\n--- Page ---\n\n";

/// A `(page, paragraph)` location. `paragraph == usize::MAX` means "last".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub page: usize,
    pub paragraph: usize,
}

impl Position {
    pub fn new(page: usize, paragraph: usize) -> Self {
        Self { page, paragraph }
    }
}

#[derive(Debug)]
pub struct DocumentState {
    pages: Vec<Page>,
    current_page: usize,
    current_paragraph: usize,
    pending_style: Style,
    pending_alignment: Alignment,
    selection: SelectionManager,
    routes: InputRoutes,
    grown_pages: BTreeSet<usize>,
}

impl Default for DocumentState {
    fn default() -> Self {
        Self::new(Style::default(), Alignment::Left)
    }
}

impl DocumentState {
    /// One page holding one empty paragraph in `style`.
    pub fn new(style: Style, alignment: Alignment) -> Self {
        let page = Page::new(0, style.clone(), alignment);
        let mut routes = InputRoutes::new();
        for para in page.paragraphs() {
            routes.attach(para.id(), InputInterest::all());
        }
        Self {
            pages: vec![page],
            current_page: 0,
            current_paragraph: 0,
            pending_style: style,
            pending_alignment: alignment,
            selection: SelectionManager::new(),
            routes,
            grown_pages: BTreeSet::new(),
        }
    }

    // --- structure -------------------------------------------------------

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, idx: usize) -> Option<&Page> {
        self.pages.get(idx)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn paragraph(&self, pos: Position) -> Option<&Paragraph> {
        self.pages.get(pos.page)?.paragraph(pos.paragraph)
    }

    /// Locate a paragraph by stable id.
    pub fn find_paragraph(&self, id: ParagraphId) -> Option<(Position, &Paragraph)> {
        self.pages.iter().enumerate().find_map(|(pi, page)| {
            page.paragraphs()
                .iter()
                .position(|p| p.id() == id)
                .map(|i| (Position::new(pi, i), &page.paragraphs()[i]))
        })
    }

    /// Where an input of `kind` addressed to `id` should be delivered, if the
    /// paragraph is live and subscribed to it.
    pub fn route(&self, id: ParagraphId, kind: InputInterest) -> Option<Position> {
        if !self.routes.accepts(id, kind) {
            trace!(target: "state.routes", paragraph = id.raw(), "unrouted");
            return None;
        }
        self.find_paragraph(id).map(|(pos, _)| pos)
    }

    pub fn routes(&self) -> &InputRoutes {
        &self.routes
    }

    // --- current position -----------------------------------------------

    /// Clamp the current position into range. Called on every entry point.
    pub fn revalidate(&mut self) {
        let last_page = self.pages.len().saturating_sub(1);
        if self.current_page > last_page {
            debug!(target: "state.edit", from = self.current_page, to = last_page, "clamp_page");
            self.current_page = last_page;
        }
        let para = self.pages[self.current_page].clamp_paragraph(self.current_paragraph);
        if para != self.current_paragraph {
            trace!(target: "state.edit", from = self.current_paragraph, to = para, "clamp_paragraph");
            self.current_paragraph = para;
        }
    }

    pub fn current(&self) -> Position {
        let page = self.current_page.min(self.pages.len().saturating_sub(1));
        Position::new(page, self.pages[page].clamp_paragraph(self.current_paragraph))
    }

    /// Move the caret. Out-of-range indices clamp; `usize::MAX` selects the
    /// last page / paragraph.
    pub fn set_current(&mut self, pos: Position) {
        self.current_page = pos.page;
        self.current_paragraph = pos.paragraph;
        self.revalidate();
    }

    pub fn current_paragraph(&self) -> &Paragraph {
        let pos = self.current();
        &self.pages[pos.page].paragraphs()[pos.paragraph]
    }

    pub(crate) fn current_paragraph_mut(&mut self) -> &mut Paragraph {
        self.revalidate();
        let (page, para) = (self.current_page, self.current_paragraph);
        &mut self.pages[page].paragraphs_mut()[para]
    }

    pub fn pending_style(&self) -> &Style {
        &self.pending_style
    }

    pub fn pending_alignment(&self) -> Alignment {
        self.pending_alignment
    }

    // --- deferred layout bookkeeping ---------------------------------------

    pub(crate) fn mark_grown(&mut self, page: usize) {
        self.grown_pages.insert(page);
    }

    /// Pages whose content may have grown since the last call.
    pub fn take_grown_pages(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.grown_pages).into_iter().collect()
    }

    /// Move the last paragraph of `page` to the start of the next page,
    /// creating a trailing page when needed. Refuses when the page holds a
    /// single paragraph. Returns the target page index.
    pub fn migrate_last_paragraph(&mut self, page: usize) -> Option<usize> {
        self.revalidate();
        let source = self.pages.get_mut(page)?;
        let last_idx = source.len().saturating_sub(1);
        let moved = source.pop_last()?;
        let id = moved.id();
        self.routes.detach(id);
        let target = page + 1;
        if target == self.pages.len() {
            self.pages.push(Page::with_paragraph(target, moved));
        } else {
            self.pages[target].insert(0, moved);
        }
        self.routes.attach(id, InputInterest::all());
        if self.current_page == page && self.current_paragraph == last_idx {
            self.current_page = target;
            self.current_paragraph = 0;
        } else if self.current_page == target {
            self.current_paragraph += 1;
        }
        self.mark_grown(target);
        debug!(target: "state.edit", from = page, to = target, paragraph = id.raw(), "migrate");
        self.revalidate();
        Some(target)
    }

    pub(crate) fn renumber_pages(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.set_index(i);
        }
    }

    // --- selection wiring -----------------------------------------------

    pub fn selection_phase(&self) -> SelectionPhase {
        self.selection.phase()
    }

    pub fn selection_manager(&self) -> &SelectionManager {
        &self.selection
    }

    /// Pointer pressed on a paragraph: moves the caret there and starts (or
    /// with shift, extends) a selection.
    pub fn pointer_press(&mut self, pos: Position, offset: Option<usize>, shift: bool) {
        self.set_current(pos);
        let cur = self.current();
        let point = SelectionPoint {
            page: cur.page,
            paragraph: cur.paragraph,
            offset,
        };
        self.selection.press(&mut self.pages, point, shift);
    }

    pub fn pointer_move(&mut self, pos: Position, offset: Option<usize>) {
        self.revalidate();
        let point = SelectionPoint {
            page: pos.page,
            paragraph: pos.paragraph,
            offset,
        };
        self.selection.pointer_move(&mut self.pages, point);
    }

    pub fn pointer_release(&mut self) {
        self.revalidate();
        let (page, para) = (self.current_page, self.current_paragraph);
        self.selection.release(&mut self.pages, page, para);
    }

    /// Host-reported character selection inside one paragraph.
    pub fn select_chars(&mut self, pos: Position, start: usize, end: usize) {
        self.revalidate();
        let Some(page) = self.pages.get(pos.page) else {
            return;
        };
        let para = page.clamp_paragraph(pos.paragraph);
        self.selection
            .select_chars(&mut self.pages, pos.page, para, start, end);
    }

    pub fn select_all(&mut self) {
        self.revalidate();
        self.selection.select_all(&mut self.pages);
    }

    pub fn clear_selection(&mut self) {
        selection::clear_all(&mut self.pages);
        self.selection.reset();
    }

    // --- queries ----------------------------------------------------------

    pub fn has_selection(&self) -> bool {
        self.pages.iter().any(Page::has_selection)
    }

    /// Selected text of every paragraph in document order, joined by `\n`.
    pub fn selected_text(&self) -> String {
        self.pages
            .iter()
            .flat_map(|p| p.paragraphs().iter())
            .filter_map(Paragraph::selected_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Plain text: paragraphs joined by `\n`, pages joined by `page_marker`.
    pub fn plain_text(&self, page_marker: &str) -> String {
        self.pages
            .iter()
            .map(Page::plain_text)
            .collect::<Vec<_>>()
            .join(page_marker)
    }

    pub fn word_count(&self) -> usize {
        grapheme::word_count(&self.plain_text("\n"))
    }

    /// 1-based current page number and total page count.
    pub fn page_status(&self) -> (usize, usize) {
        (self.current().page + 1, self.pages.len())
    }

    pub fn page_label(&self) -> String {
        let (cur, total) = self.page_status();
        format!("Page {cur} of {total}")
    }

    /// Line height of the current paragraph: trailing run font size times
    /// `factor`, or `fallback` when the paragraph has no runs.
    pub fn current_line_height(&self, factor: f64, fallback: f64) -> f64 {
        self.current_paragraph()
            .trailing_style()
            .map(|s| s.font_size * factor)
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_one_blank_page() {
        let doc = DocumentState::default();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages()[0].is_blank());
        assert_eq!(doc.current(), Position::new(0, 0));
        assert_eq!(doc.routes().len(), 1);
        assert_eq!(doc.page_label(), "Page 1 of 1");
    }

    #[test]
    fn set_current_clamps_and_resolves_last_sentinel() {
        let mut doc = DocumentState::default();
        doc.insert_text("a\nb\nc");
        doc.set_current(Position::new(9, usize::MAX));
        assert_eq!(doc.current(), Position::new(0, 2));
        doc.set_current(Position::new(0, 1));
        assert_eq!(doc.current_paragraph().text(), "b");
    }

    #[test]
    fn migration_moves_caret_with_paragraph() {
        let mut doc = DocumentState::default();
        doc.insert_text("a\nb\nc");
        assert_eq!(doc.current(), Position::new(0, 2));
        let id = doc.current_paragraph().id();
        assert_eq!(doc.migrate_last_paragraph(0), Some(1));
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.current(), Position::new(1, 0));
        assert_eq!(doc.current_paragraph().id(), id);
        assert_eq!(doc.route(id, InputInterest::TEXT), Some(Position::new(1, 0)));
        assert_eq!(doc.pages()[1].index(), 1);
    }

    #[test]
    fn migration_into_existing_page_shifts_caret_there() {
        let mut doc = DocumentState::default();
        doc.insert_text("a\nb\nc");
        doc.migrate_last_paragraph(0);
        doc.set_current(Position::new(0, 0));
        doc.migrate_last_paragraph(0);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[1].plain_text(), "b\nc");
        assert_eq!(doc.current(), Position::new(0, 0));
        assert_eq!(doc.migrate_last_paragraph(0), None);
    }

    #[test]
    fn caret_on_target_page_stays_on_its_paragraph() {
        let mut doc = DocumentState::default();
        doc.insert_text("a\nb\nc");
        doc.migrate_last_paragraph(0);
        assert_eq!(doc.current(), Position::new(1, 0));
        let id = doc.current_paragraph().id();
        assert_eq!(doc.migrate_last_paragraph(0), Some(1));
        assert_eq!(doc.pages()[1].plain_text(), "b\nc");
        assert_eq!(doc.current(), Position::new(1, 1));
        assert_eq!(doc.current_paragraph().id(), id);
        assert_eq!(doc.route(id, InputInterest::TEXT), Some(Position::new(1, 1)));
    }

    #[test]
    fn plain_text_uses_marker_between_pages() {
        let mut doc = DocumentState::default();
        doc.insert_text("one two\nthree");
        doc.migrate_last_paragraph(0);
        assert_eq!(
            doc.plain_text(DEFAULT_PAGE_MARKER),
            "one two\n\n--- Page ---\n\nthree"
        );
        assert_eq!(doc.word_count(), 3);
        assert_eq!(doc.page_status(), (2, 2));
    }

    #[test]
    fn line_height_tracks_trailing_run() {
        let mut doc = DocumentState::default();
        doc.set_font_size(20.0);
        doc.insert_text("x");
        assert!((doc.current_line_height(1.2, 18.0) - 24.0).abs() < 1e-9);
    }
}
