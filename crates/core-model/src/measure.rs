//! Text measurement capability and a deterministic headless implementation.
//!
//! The host's text-shaping engine is consumed only through `TextMeasurer` /
//! `TextLayout`. `MonospaceMeasurer` stands in for it when the editor runs
//! without a GUI: every grapheme advances `font_size * 0.5` pixels per
//! display cell, lines wrap greedily at whitespace (falling back to a
//! grapheme break for words longer than the line) and each line is
//! `font_size * line_height_factor` tall.

use crate::layout::Rect;
use core_text::segment::{Segment, segment};
use core_text::{Paragraph, Style};

/// Width of the caret rect reported by hit-tests.
pub const CARET_WIDTH: f64 = 1.0;

/// A laid-out block of text.
pub trait TextLayout {
    /// Local rect of the caret placed before character `offset`
    /// (`offset == len` places it after the last character).
    fn hit_test(&self, offset: usize) -> Option<Rect>;
    /// Height of the block when wrapped at `available_width`.
    fn measure_height(&self, available_width: f64) -> f64;
}

pub trait TextMeasurer {
    /// Lay out `text` in `style` wrapped at `max_width`. `None` when no layout
    /// can be produced (e.g. zero width).
    fn layout(&self, text: &str, style: &Style, max_width: f64) -> Option<Box<dyn TextLayout>>;

    /// Rendered height of a whole paragraph. The default lays the text out in
    /// the style of its largest run.
    fn paragraph_height(&self, paragraph: &Paragraph, width: f64) -> f64 {
        let style = paragraph
            .runs()
            .iter()
            .map(|r| &r.style)
            .max_by(|a, b| a.font_size.total_cmp(&b.font_size));
        let Some(style) = style else {
            return 0.0;
        };
        self.layout(&paragraph.text(), style, width)
            .map(|l| l.measure_height(width))
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    pub line_height_factor: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            line_height_factor: 1.2,
        }
    }
}

impl MonospaceMeasurer {
    pub fn new(line_height_factor: f64) -> Self {
        Self { line_height_factor }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn layout(&self, text: &str, style: &Style, max_width: f64) -> Option<Box<dyn TextLayout>> {
        if !(max_width.is_finite() && max_width > 0.0) {
            return None;
        }
        Some(Box::new(MonospaceLayout::new(
            text,
            style.font_size * 0.5,
            style.font_size * self.line_height_factor,
            max_width,
        )))
    }
}

/// Greedy-wrapped monospace layout. Lines are char ranges `[start, end)`.
#[derive(Debug, Clone)]
pub struct MonospaceLayout {
    segments: Vec<Segment>,
    cell: f64,
    line_height: f64,
    lines: Vec<(usize, usize)>,
}

impl MonospaceLayout {
    fn new(text: &str, cell: f64, line_height: f64, max_width: f64) -> Self {
        let segments = segment(text);
        let lines = wrap(&segments, cell, max_width);
        Self {
            segments,
            cell,
            line_height,
            lines,
        }
    }

    fn advance(&self, from: usize, to: usize) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.start >= from && s.end <= to)
            .map(|s| s.width as f64 * self.cell)
            .sum()
    }
}

fn wrap(segments: &[Segment], cell: f64, max_width: f64) -> Vec<(usize, usize)> {
    let total = segments.last().map(|s| s.end).unwrap_or(0);
    let mut lines = Vec::new();
    let mut line_start = 0usize;
    let mut line_width = 0.0f64;
    // char index just after the last whitespace on this line, and the width up to it
    let mut last_break: Option<(usize, f64)> = None;
    for seg in segments {
        let w = seg.width as f64 * cell;
        if line_width + w > max_width && line_width > 0.0 {
            match last_break {
                Some((at, width_at)) if at > line_start => {
                    lines.push((line_start, at));
                    line_start = at;
                    line_width -= width_at;
                }
                _ => {
                    lines.push((line_start, seg.start));
                    line_start = seg.start;
                    line_width = 0.0;
                }
            }
            last_break = None;
        }
        line_width += w;
        if seg.cluster.chars().all(char::is_whitespace) {
            last_break = Some((seg.end, line_width));
        }
    }
    lines.push((line_start, total));
    lines
}

impl TextLayout for MonospaceLayout {
    fn hit_test(&self, offset: usize) -> Option<Rect> {
        let total = self.lines.last().map(|l| l.1).unwrap_or(0);
        let offset = offset.min(total);
        let (row, &(start, _)) = self
            .lines
            .iter()
            .enumerate()
            .find(|(_, (s, e))| offset >= *s && offset < *e)
            .or_else(|| self.lines.iter().enumerate().last())?;
        let x = self.advance(start, offset);
        Some(Rect::new(
            x,
            row as f64 * self.line_height,
            CARET_WIDTH,
            self.line_height,
        ))
    }

    fn measure_height(&self, available_width: f64) -> f64 {
        if !(available_width.is_finite() && available_width > 0.0) {
            return 0.0;
        }
        wrap(&self.segments, self.cell, available_width).len() as f64 * self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::Alignment;

    fn style(size: f64) -> Style {
        let mut s = Style::default();
        s.set_font_size(size);
        s
    }

    #[test]
    fn short_text_is_one_line() {
        let m = MonospaceMeasurer::default();
        let layout = m.layout("Hello", &style(10.0), 100.0).unwrap();
        assert_eq!(layout.measure_height(100.0), 12.0);
        let r = layout.hit_test(5).unwrap();
        assert_eq!((r.x, r.y, r.height), (25.0, 0.0, 12.0));
    }

    #[test]
    fn wraps_at_whitespace() {
        // cell = 5px, width 30px -> 6 cells per line
        let m = MonospaceMeasurer::default();
        let layout = m.layout("aaa bbb ccc", &style(10.0), 30.0).unwrap();
        assert_eq!(layout.measure_height(30.0), 36.0);
        // 'b' of "bbb" starts line two
        let r = layout.hit_test(4).unwrap();
        assert_eq!((r.x, r.y), (0.0, 12.0));
        // end of text sits after "ccc" on line three
        let end = layout.hit_test(11).unwrap();
        assert_eq!((end.x, end.y), (15.0, 24.0));
    }

    #[test]
    fn long_word_breaks_by_grapheme() {
        let segs = segment("abcdefgh");
        assert_eq!(wrap(&segs, 5.0, 20.0), vec![(0, 4), (4, 8)]);
    }

    #[test]
    fn wide_clusters_take_two_cells() {
        let m = MonospaceMeasurer::default();
        let layout = m.layout("漢a", &style(10.0), 100.0).unwrap();
        assert_eq!(layout.hit_test(1).unwrap().x, 10.0);
    }

    #[test]
    fn empty_text_has_one_line_and_zero_width_is_none() {
        let m = MonospaceMeasurer::default();
        let layout = m.layout("", &style(10.0), 50.0).unwrap();
        assert_eq!(layout.measure_height(50.0), 12.0);
        assert_eq!(layout.hit_test(3).unwrap().x, 0.0);
        assert!(m.layout("x", &style(10.0), 0.0).is_none());
    }

    #[test]
    fn paragraph_height_uses_largest_run() {
        let m = MonospaceMeasurer::default();
        let mut p = Paragraph::with_text("a", style(10.0), Alignment::Left);
        p.append_text("b", &style(20.0));
        assert_eq!(m.paragraph_height(&p, 600.0), 24.0);
    }
}
