//! Caret placement and blink timing.

use crate::layout::{LayoutNode, PageGeometry, Rect, TransformLookup};
use crate::measure::TextMeasurer;
use core_state::DocumentState;
use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretSettings {
    pub blink_interval: Duration,
    pub line_height_factor: f64,
    pub fallback_line_height: f64,
}

impl Default for CaretSettings {
    fn default() -> Self {
        Self {
            blink_interval: Duration::from_millis(500),
            line_height_factor: 1.2,
            fallback_line_height: 18.0,
        }
    }
}

/// Canvas rect of the caret for the current paragraph, or `None` (caret
/// hidden) when any step of the chain is unavailable.
///
/// The caret sits at the end of the effective selection when one exists,
/// otherwise after the paragraph's last character. Its height is the
/// current line height rather than the layout's row height.
pub fn locate(
    doc: &DocumentState,
    geometry: &PageGeometry,
    measurer: &dyn TextMeasurer,
    transforms: &dyn TransformLookup,
    settings: &CaretSettings,
) -> Option<Rect> {
    let pos = doc.current();
    let para = doc.paragraph(pos)?;
    let style = para.trailing_style()?;
    let layout = measurer.layout(&para.text(), style, geometry.content_width())?;
    let len = para.len();
    let offset = para.selection().map(|(_, end)| end).unwrap_or(len).min(len);
    let local = layout.hit_test(offset)?;
    if local.height <= 0.0 {
        trace!(target: "model.caret", "zero-size layout");
        return None;
    }
    let height = doc.current_line_height(settings.line_height_factor, settings.fallback_line_height);
    let local = Rect::new(local.x, local.y, local.width, height);
    let to_canvas = transforms.transform_to_ancestor(
        LayoutNode::Paragraph {
            page: pos.page,
            paragraph: pos.paragraph,
        },
        LayoutNode::Canvas,
    )?;
    Some(to_canvas.apply_rect(local))
}

/// Caret blink phase driven by explicit instants.
#[derive(Debug, Clone)]
pub struct CaretBlink {
    interval: Duration,
    visible: bool,
    last_toggle: Instant,
}

impl CaretBlink {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            visible: true,
            last_toggle: now,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Force the caret visible and restart the interval (caret moved).
    pub fn reset(&mut self, now: Instant) {
        self.visible = true;
        self.last_toggle = now;
    }

    /// Advance to `now`; returns true when visibility flipped.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.interval.is_zero() {
            return false;
        }
        if now.saturating_duration_since(self.last_toggle) >= self.interval {
            self.visible = !self.visible;
            self.last_toggle = now;
            return true;
        }
        false
    }
}
