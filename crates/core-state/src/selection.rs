//! Selection manager: anchor/focus drag state and multi-page range resolution.
//!
//! Every selection is expressed per paragraph as a `(start, end)` pair, with
//! `(0, SELECTION_END)` meaning "whole paragraph". Resolution orders the two
//! endpoints by `(page, paragraph)` and then:
//!
//! * pages outside `[min, max]` are cleared,
//! * pages strictly inside are fully selected,
//! * on the boundary page(s), paragraphs before `min` / after `max` are
//!   cleared, the endpoint paragraphs get an intra-paragraph range, and the
//!   paragraphs between them are fully selected.
//!
//! Endpoint paragraphs use a character offset only when the host reported
//! one (`select_chars`); otherwise they are selected from / to their edge.

use crate::Page;
use core_text::SELECTION_END;
use tracing::{debug, trace};

/// One selection endpoint. `paragraph == usize::MAX` denotes the page's last
/// paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPoint {
    pub page: usize,
    pub paragraph: usize,
    pub offset: Option<usize>,
}

impl SelectionPoint {
    pub fn new(page: usize, paragraph: usize) -> Self {
        Self {
            page,
            paragraph,
            offset: None,
        }
    }

    pub fn at(page: usize, paragraph: usize, offset: usize) -> Self {
        Self {
            page,
            paragraph,
            offset: Some(offset),
        }
    }

    fn key(&self) -> (usize, usize) {
        (self.page, self.paragraph)
    }

    /// Clamp page and paragraph against the current pages (resolves the
    /// "last" sentinel). Returns `None` when there are no pages.
    fn clamped(&self, pages: &[Page]) -> Option<Self> {
        let page = self.page.min(pages.len().checked_sub(1)?);
        let paragraph = pages[page].clamp_paragraph(self.paragraph);
        Some(Self {
            page,
            paragraph,
            offset: self.offset,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPhase {
    #[default]
    Idle,
    Dragging,
    /// Drag ended; the focused paragraph's range has been saved.
    Committed,
}

#[derive(Debug, Default)]
pub struct SelectionManager {
    anchor: Option<SelectionPoint>,
    focus: Option<SelectionPoint>,
    phase: SelectionPhase,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn anchor(&self) -> Option<SelectionPoint> {
        self.anchor
    }

    pub fn focus(&self) -> Option<SelectionPoint> {
        self.focus
    }

    /// Forget anchor and focus without touching paragraph state.
    pub fn reset(&mut self) {
        self.anchor = None;
        self.focus = None;
        self.phase = SelectionPhase::Idle;
    }

    /// Pointer pressed on `point`. Without shift the anchor moves and every
    /// selection is cleared; with shift (and an existing anchor) the range is
    /// resolved immediately.
    pub fn press(&mut self, pages: &mut [Page], point: SelectionPoint, shift: bool) {
        if shift && let Some(anchor) = self.anchor {
            self.focus = Some(point);
            resolve_range(pages, anchor, point);
            trace!(target: "state.select", page = point.page, paragraph = point.paragraph, "shift_press");
            return;
        }
        clear_all(pages);
        if let Some(p) = point.clamped(pages)
            && let Some(offset) = p.offset
            && let Some(para) = pages[p.page].paragraph_mut(p.paragraph)
        {
            para.set_selection(offset, offset);
        }
        self.anchor = Some(point);
        self.focus = Some(point);
        self.phase = SelectionPhase::Dragging;
        trace!(target: "state.select", page = point.page, paragraph = point.paragraph, "press");
    }

    /// Pointer moved to `point`; only meaningful while dragging.
    pub fn pointer_move(&mut self, pages: &mut [Page], point: SelectionPoint) {
        if self.phase != SelectionPhase::Dragging {
            return;
        }
        let Some(anchor) = self.anchor else {
            return;
        };
        if self.focus.map(|f| f.key()) == Some(point.key()) && point.offset.is_none() {
            return;
        }
        self.focus = Some(point);
        resolve_range(pages, anchor, point);
    }

    /// Drag ended: save the focused paragraph's live range.
    pub fn release(&mut self, pages: &mut [Page], focused_page: usize, focused_paragraph: usize) {
        if let Some(para) = pages
            .get_mut(focused_page)
            .and_then(|p| p.paragraph_mut(focused_paragraph))
        {
            para.commit_selection();
        }
        self.phase = SelectionPhase::Committed;
        trace!(target: "state.select", "release");
    }

    /// Host-reported character selection inside one paragraph.
    pub fn select_chars(
        &mut self,
        pages: &mut [Page],
        page: usize,
        paragraph: usize,
        start: usize,
        end: usize,
    ) {
        let key = (page, paragraph);
        let anchor_hit = self.anchor.filter(|a| a.key() == key);
        let focus_hit = self.focus.filter(|f| f.key() == key);
        match (self.anchor, anchor_hit, focus_hit) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                if let Some(a) = self.anchor.as_mut()
                    && a.key() == key
                {
                    a.offset = Some(start);
                }
                if let Some(f) = self.focus.as_mut()
                    && f.key() == key
                {
                    f.offset = Some(end);
                }
            }
            _ => {
                clear_all(pages);
                self.anchor = Some(SelectionPoint::at(page, paragraph, start));
                self.focus = Some(SelectionPoint::at(page, paragraph, end));
                if self.phase == SelectionPhase::Idle {
                    self.phase = SelectionPhase::Committed;
                }
            }
        }
        if let (Some(a), Some(f)) = (self.anchor, self.focus) {
            // anchor/focus in the same paragraph take the reported range as-is
            if a.key() == f.key() {
                if let Some(para) = pages.get_mut(page).and_then(|p| p.paragraph_mut(paragraph)) {
                    para.clear_saved_selection();
                    para.set_selection(start, end);
                }
            } else {
                resolve_range(pages, a, f);
            }
        }
    }

    /// Select every paragraph of every page.
    pub fn select_all(&mut self, pages: &mut [Page]) {
        for page in pages.iter_mut() {
            for para in page.paragraphs_mut() {
                para.clear_saved_selection();
                para.select_all();
            }
        }
        self.anchor = Some(SelectionPoint::new(0, 0));
        self.focus = Some(SelectionPoint::new(
            pages.len().saturating_sub(1),
            usize::MAX,
        ));
        self.phase = SelectionPhase::Committed;
        debug!(target: "state.select", pages = pages.len(), "select_all");
    }
}

/// Clear live and saved selection on every paragraph.
pub fn clear_all(pages: &mut [Page]) {
    for page in pages.iter_mut() {
        for para in page.paragraphs_mut() {
            para.clear_selection();
        }
    }
}

/// Apply the range between `a` and `b` (in either order) to every paragraph.
pub fn resolve_range(pages: &mut [Page], a: SelectionPoint, b: SelectionPoint) {
    let (Some(a), Some(b)) = (a.clamped(pages), b.clamped(pages)) else {
        return;
    };
    let (min, max) = if a.key() <= b.key() { (a, b) } else { (b, a) };
    for (pi, page) in pages.iter_mut().enumerate() {
        for (i, para) in page.paragraphs_mut().iter_mut().enumerate() {
            para.clear_saved_selection();
            let here = (pi, i);
            if here < min.key() || here > max.key() {
                para.clear_selection();
                continue;
            }
            let is_min = here == min.key();
            let is_max = here == max.key();
            match (is_min, is_max) {
                (true, true) => match (min.offset, max.offset) {
                    (Some(s), Some(e)) => para.set_selection(s, e),
                    _ => para.clear_selection(),
                },
                (true, false) => para.set_selection(min.offset.unwrap_or(0), SELECTION_END),
                (false, true) => para.set_selection(0, max.offset.unwrap_or(SELECTION_END)),
                (false, false) => para.select_all(),
            }
        }
    }
    trace!(
        target: "state.select",
        min_page = min.page,
        min_paragraph = min.paragraph,
        max_page = max.page,
        max_paragraph = max.paragraph,
        "resolve_range"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{Alignment, Paragraph, Style};

    fn pages(shape: &[usize]) -> Vec<Page> {
        shape
            .iter()
            .enumerate()
            .map(|(pi, &n)| {
                let mut page = Page::with_paragraph(
                    pi,
                    Paragraph::with_text("p0 text", Style::default(), Alignment::Left),
                );
                for i in 1..n {
                    page.insert(
                        i,
                        Paragraph::with_text(&format!("p{i} text"), Style::default(), Alignment::Left),
                    );
                }
                page
            })
            .collect()
    }

    fn selected(pages: &[Page]) -> Vec<(usize, usize, (usize, usize))> {
        let mut out = Vec::new();
        for (pi, page) in pages.iter().enumerate() {
            for (i, para) in page.paragraphs().iter().enumerate() {
                if let Some(r) = para.selection() {
                    out.push((pi, i, r));
                }
            }
        }
        out
    }

    #[test]
    fn cross_page_range_selects_inner_pages_fully() {
        let mut ps = pages(&[3, 2, 3]);
        resolve_range(&mut ps, SelectionPoint::new(2, 1), SelectionPoint::new(0, 1));
        let sel = selected(&ps);
        // page 0: paragraphs 1..; page 1: all; page 2: ..=1
        let keys: Vec<_> = sel.iter().map(|(p, i, _)| (*p, *i)).collect();
        assert_eq!(keys, vec![(0, 1), (0, 2), (1, 0), (1, 1), (2, 0), (2, 1)]);
        assert!(sel.iter().all(|(_, _, r)| *r == (0, 7)));
    }

    #[test]
    fn endpoint_offsets_bound_the_edge_paragraphs() {
        let mut ps = pages(&[3]);
        resolve_range(&mut ps, SelectionPoint::at(0, 0, 3), SelectionPoint::at(0, 2, 2));
        assert_eq!(
            selected(&ps),
            vec![(0, 0, (3, 7)), (0, 1, (0, 7)), (0, 2, (0, 2))]
        );
    }

    #[test]
    fn last_sentinel_selects_through_end() {
        let mut ps = pages(&[2, 2]);
        resolve_range(&mut ps, SelectionPoint::new(0, 1), SelectionPoint::new(7, usize::MAX));
        assert_eq!(selected(&ps).len(), 3);
    }

    #[test]
    fn press_clears_then_drag_resolves_and_release_commits() {
        let mut ps = pages(&[2, 2]);
        let mut mgr = SelectionManager::new();
        ps[1].paragraph_mut(1).unwrap().select_all();
        mgr.press(&mut ps, SelectionPoint::new(0, 1), false);
        assert!(selected(&ps).is_empty());
        assert_eq!(mgr.phase(), SelectionPhase::Dragging);
        mgr.pointer_move(&mut ps, SelectionPoint::new(1, 0));
        assert_eq!(selected(&ps).len(), 2);
        mgr.release(&mut ps, 0, 1);
        assert_eq!(mgr.phase(), SelectionPhase::Committed);
        assert_eq!(ps[0].paragraph(1).unwrap().saved_selection(), Some((0, SELECTION_END)));
        // moves after release do not extend
        mgr.pointer_move(&mut ps, SelectionPoint::new(1, 1));
        assert_eq!(selected(&ps).len(), 2);
    }

    #[test]
    fn shift_press_extends_from_existing_anchor() {
        let mut ps = pages(&[3]);
        let mut mgr = SelectionManager::new();
        mgr.press(&mut ps, SelectionPoint::new(0, 0), false);
        mgr.release(&mut ps, 0, 0);
        mgr.press(&mut ps, SelectionPoint::new(0, 2), true);
        assert_eq!(selected(&ps).len(), 3);
    }

    #[test]
    fn select_chars_in_anchor_paragraph_sets_precise_range() {
        let mut ps = pages(&[2]);
        let mut mgr = SelectionManager::new();
        mgr.press(&mut ps, SelectionPoint::new(0, 0), false);
        mgr.select_chars(&mut ps, 0, 0, 1, 4);
        assert_eq!(selected(&ps), vec![(0, 0, (1, 4))]);
        mgr.pointer_move(&mut ps, SelectionPoint::new(0, 1));
        assert_eq!(selected(&ps), vec![(0, 0, (1, 7)), (0, 1, (0, 7))]);
    }

    #[test]
    fn select_all_covers_every_paragraph() {
        let mut ps = pages(&[1, 3]);
        let mut mgr = SelectionManager::new();
        mgr.select_all(&mut ps);
        assert_eq!(selected(&ps).len(), 4);
    }
}
