//! Overflow detection and paragraph migration.
//!
//! `check_overflow` runs as a deferred layout task, never inside the edit
//! that caused the growth. It moves at most one paragraph per call; the
//! caller re-queues both pages so a large insertion settles over several
//! passes. A page holding a single paragraph is never split, which bounds
//! the number of passes.

use crate::layout::PageGeometry;
use crate::measure::TextMeasurer;
use core_state::DocumentState;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverflowOutcome {
    /// Page content fits the content area.
    Fits { height: f64 },
    /// The last paragraph moved to the start of page `to`.
    Migrated { from: usize, to: usize, height: f64 },
    /// A lone paragraph exceeds the content area; nothing can move.
    Oversized { height: f64 },
    /// The page index no longer exists (stale task).
    Skipped,
}

/// Content height of `page` as the pagination check sees it: the sum of
/// each paragraph's measured height floored at the minimum paragraph height.
pub fn page_content_height(
    doc: &DocumentState,
    page: usize,
    geometry: &PageGeometry,
    measurer: &dyn TextMeasurer,
) -> Option<f64> {
    let width = geometry.content_width();
    let page = doc.page(page)?;
    Some(
        page.paragraphs()
            .iter()
            .map(|p| {
                measurer
                    .paragraph_height(p, width)
                    .max(geometry.min_paragraph_height)
            })
            .sum(),
    )
}

pub fn check_overflow(
    doc: &mut DocumentState,
    page: usize,
    geometry: &PageGeometry,
    measurer: &dyn TextMeasurer,
) -> OverflowOutcome {
    let Some(height) = page_content_height(doc, page, geometry, measurer) else {
        trace!(target: "model.paginate", page, "stale page index");
        return OverflowOutcome::Skipped;
    };
    let limit = geometry.content_height();
    if height <= limit {
        trace!(target: "model.paginate", page, height, limit, "fits");
        return OverflowOutcome::Fits { height };
    }
    match doc.migrate_last_paragraph(page) {
        Some(to) => {
            debug!(target: "model.paginate", from = page, to, height, limit, "migrated");
            OverflowOutcome::Migrated {
                from: page,
                to,
                height,
            }
        }
        None => {
            debug!(target: "model.paginate", page, height, limit, "oversized paragraph");
            OverflowOutcome::Oversized { height }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::TextLayout;
    use core_text::{Paragraph, Style};

    /// Every paragraph measures a fixed height.
    struct FixedHeight(f64);

    impl TextMeasurer for FixedHeight {
        fn layout(&self, _: &str, _: &Style, _: f64) -> Option<Box<dyn TextLayout>> {
            None
        }
        fn paragraph_height(&self, _: &Paragraph, _: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn overflowing_page_moves_last_paragraph_to_new_page() {
        let mut doc = DocumentState::default();
        doc.insert_text("one\ntwo\nthree");
        let g = PageGeometry::default();
        let m = FixedHeight(300.0);
        assert_eq!(page_content_height(&doc, 0, &g, &m), Some(900.0));
        let out = check_overflow(&mut doc, 0, &g, &m);
        assert_eq!(
            out,
            OverflowOutcome::Migrated {
                from: 0,
                to: 1,
                height: 900.0
            }
        );
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages()[1].plain_text(), "three");
        assert!(page_content_height(&doc, 0, &g, &m).unwrap() <= g.content_height());
        assert_eq!(check_overflow(&mut doc, 0, &g, &m), OverflowOutcome::Fits { height: 600.0 });
    }

    #[test]
    fn single_oversized_paragraph_stays() {
        let mut doc = DocumentState::default();
        doc.insert_text("huge");
        let g = PageGeometry::default();
        let out = check_overflow(&mut doc, 0, &g, &FixedHeight(2000.0));
        assert_eq!(out, OverflowOutcome::Oversized { height: 2000.0 });
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn stale_index_is_skipped() {
        let mut doc = DocumentState::default();
        let g = PageGeometry::default();
        assert_eq!(check_overflow(&mut doc, 4, &g, &FixedHeight(1.0)), OverflowOutcome::Skipped);
    }

    #[test]
    fn minimum_paragraph_height_counts() {
        let mut doc = DocumentState::default();
        doc.insert_text("a\nb");
        let g = PageGeometry::default();
        assert_eq!(page_content_height(&doc, 0, &g, &FixedHeight(0.0)), Some(40.0));
    }
}
