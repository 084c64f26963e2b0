//! Editor model: document state wired to layout, pagination and the caret.
//!
//! Edits follow a two-phase commit:
//! 1. `edit` runs a synchronous mutation on `DocumentState` and queues a
//!    `LayoutTask::CheckOverflow` for every page the mutation may have grown.
//! 2. `run_layout_pass` (the "after layout" step) re-measures, runs the
//!    queued checks and re-queues pages touched by a migration, then
//!    refreshes the layout snapshot and caret rect.
//!
//! Tasks queued during a pass run in the next pass, so a large insertion
//! migrates one paragraph per pass. `settle` drives passes until the queue
//! drains.
//!
//! Invariants after `settle` returns:
//! * every page's content height is within the content area, or the page
//!   holds exactly one paragraph;
//! * the current position is valid for the current pages.

use core_events::{LayoutQueue, LayoutTask};
use core_state::{DocumentState, Position};
use std::time::Instant;
use tracing::{debug, trace};

pub mod caret;
pub mod layout;
pub mod measure;
pub mod pagination;

pub use caret::{CaretBlink, CaretSettings};
pub use layout::{
    AffineTransform, LayoutNode, LayoutSnapshot, PageGeometry, Point, Rect, TransformLookup,
};
pub use measure::{MonospaceMeasurer, TextLayout, TextMeasurer};
pub use pagination::{OverflowOutcome, check_overflow};

/// Upper bound on passes `settle` runs before giving up.
pub const MAX_SETTLE_PASSES: usize = 10_000;

/// Summary of one layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutPassReport {
    pub checked: usize,
    pub migrated: usize,
}

pub struct EditorModel {
    state: DocumentState,
    queue: LayoutQueue,
    geometry: PageGeometry,
    caret_settings: CaretSettings,
    blink: CaretBlink,
    measurer: Box<dyn TextMeasurer>,
    snapshot: LayoutSnapshot,
    caret_rect: Option<Rect>,
}

impl EditorModel {
    pub fn new(
        state: DocumentState,
        geometry: PageGeometry,
        caret_settings: CaretSettings,
        measurer: Box<dyn TextMeasurer>,
    ) -> Self {
        let blink = CaretBlink::new(caret_settings.blink_interval, Instant::now());
        let mut model = Self {
            state,
            queue: LayoutQueue::new(),
            geometry,
            caret_settings,
            blink,
            measurer,
            snapshot: LayoutSnapshot::empty(geometry),
            caret_rect: None,
        };
        model.refresh_layout();
        model
    }

    /// Headless model with default geometry and the monospace measurer.
    pub fn headless(state: DocumentState) -> Self {
        let settings = CaretSettings::default();
        Self::new(
            state,
            PageGeometry::default(),
            settings,
            Box::new(MonospaceMeasurer::new(settings.line_height_factor)),
        )
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn caret_settings(&self) -> &CaretSettings {
        &self.caret_settings
    }

    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Phase 1: apply a synchronous mutation and queue overflow checks for
    /// the pages it grew. Resets the caret blink when the caret moved.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut DocumentState) -> R) -> R {
        let before = self.state.current();
        let out = f(&mut self.state);
        for page in self.state.take_grown_pages() {
            self.queue.schedule(LayoutTask::CheckOverflow { page });
        }
        if self.state.current() != before {
            self.blink.reset(Instant::now());
        }
        out
    }

    /// Phase 2: run the tasks queued before this call.
    pub fn run_layout_pass(&mut self) -> LayoutPassReport {
        let mut report = LayoutPassReport::default();
        for task in self.queue.begin_pass() {
            match task {
                LayoutTask::CheckOverflow { page } => {
                    report.checked += 1;
                    let outcome = check_overflow(
                        &mut self.state,
                        page,
                        &self.geometry,
                        self.measurer.as_ref(),
                    );
                    if let OverflowOutcome::Migrated { from, to, .. } = outcome {
                        report.migrated += 1;
                        self.queue.schedule(LayoutTask::CheckOverflow { page: from });
                        self.queue.schedule(LayoutTask::CheckOverflow { page: to });
                    }
                }
            }
        }
        for page in self.state.take_grown_pages() {
            self.queue.schedule(LayoutTask::CheckOverflow { page });
        }
        self.state.revalidate();
        self.refresh_layout();
        trace!(
            target: "model.paginate",
            checked = report.checked,
            migrated = report.migrated,
            pending = self.queue.len(),
            "layout_pass"
        );
        report
    }

    /// Run layout passes until no task remains. Returns the number of passes.
    pub fn settle(&mut self) -> usize {
        let mut passes = 0;
        while !self.queue.is_empty() && passes < MAX_SETTLE_PASSES {
            self.run_layout_pass();
            passes += 1;
        }
        if passes > 0 {
            debug!(target: "model.paginate", passes, pages = self.state.page_count(), "settled");
        }
        passes
    }

    /// Re-measure and re-place the caret. Any caret movement, including
    /// within the same paragraph, restarts the blink phase.
    fn refresh_layout(&mut self) {
        self.snapshot = LayoutSnapshot::measure(&self.state, self.geometry, self.measurer.as_ref());
        let rect = caret::locate(
            &self.state,
            &self.geometry,
            self.measurer.as_ref(),
            &self.snapshot,
            &self.caret_settings,
        );
        if rect != self.caret_rect {
            self.blink.reset(Instant::now());
        }
        self.caret_rect = rect;
    }

    /// Caret rect from the last layout pass (`None` = hidden).
    pub fn caret_rect(&self) -> Option<Rect> {
        self.caret_rect
    }

    /// Caret rect if it is in the visible blink phase.
    pub fn visible_caret(&self) -> Option<Rect> {
        self.caret_rect.filter(|_| self.blink.visible())
    }

    /// Advance the blink timer; true when visibility flipped.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.blink.tick(now)
    }

    /// Map a canvas point to a paragraph using the last snapshot.
    pub fn hit_test(&self, point: Point) -> Option<Position> {
        self.snapshot.hit_test(point)
    }

    /// Content height of `page` in the last snapshot.
    pub fn page_height(&self, page: usize) -> Option<f64> {
        self.snapshot.content_height(page)
    }
}
