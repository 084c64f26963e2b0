//! Canvas geometry: points, rects, affine transforms, page geometry and the
//! measured layout snapshot.
//!
//! Coordinates are pixels. The canvas stacks pages vertically, page `i`
//! starting at `i * (height + spacing)`. Inside a page, paragraphs stack
//! from the top padding, each occupying at least `min_paragraph_height`.
//!
//! `LayoutSnapshot` is the result of one measurement pass. It answers
//! transform lookups (paragraph -> page -> canvas) and pointer hit-tests;
//! nodes it did not measure report `None`, which callers treat as "not laid
//! out yet".

use crate::measure::TextMeasurer;
use core_state::{DocumentState, Position};
use tracing::trace;

/// Distance below a page's bottom edge still attributed to that page.
pub const PAGE_HIT_SLOP: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// 2D affine transform `[m11 m12; m21 m22] + (dx, dy)` applied to row vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        dx: 0.0,
        dy: 0.0,
    };

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            dx,
            dy,
            ..Self::IDENTITY
        }
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &AffineTransform) -> Self {
        Self {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.m11 + p.y * self.m21 + self.dx,
            p.x * self.m12 + p.y * self.m22 + self.dy,
        )
    }

    /// Axis-aligned bounds of the transformed rect.
    pub fn apply_rect(&self, r: Rect) -> Rect {
        let corners = [
            self.apply(Point::new(r.x, r.y)),
            self.apply(Point::new(r.right(), r.y)),
            self.apply(Point::new(r.x, r.bottom())),
            self.apply(Point::new(r.right(), r.bottom())),
        ];
        let min_x = corners.iter().map(|c| c.x).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|c| c.y).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|c| c.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = corners.iter().map(|c| c.y).fold(f64::NEG_INFINITY, f64::max);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// Fixed page geometry shared by every page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub spacing: f64,
    pub min_paragraph_height: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 816.0,
            height: 1056.0,
            padding: 96.0,
            spacing: 30.0,
            min_paragraph_height: 20.0,
        }
    }
}

impl PageGeometry {
    /// Height available to paragraphs (864 with the defaults).
    pub fn content_height(&self) -> f64 {
        (self.height - 2.0 * self.padding).max(0.0)
    }

    pub fn content_width(&self) -> f64 {
        (self.width - 2.0 * self.padding).max(0.0)
    }

    pub fn page_top(&self, page: usize) -> f64 {
        page as f64 * (self.height + self.spacing)
    }

    pub fn page_rect(&self, page: usize) -> Rect {
        Rect::new(0.0, self.page_top(page), self.width, self.height)
    }
}

/// Nodes of the visual tree a transform can be requested between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutNode {
    Canvas,
    Page(usize),
    Paragraph { page: usize, paragraph: usize },
}

/// Transform lookup capability (render tree).
pub trait TransformLookup {
    fn transform_to_ancestor(&self, node: LayoutNode, ancestor: LayoutNode)
    -> Option<AffineTransform>;
}

/// Measured paragraph heights of every page plus the geometry they were
/// measured against.
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    geometry: PageGeometry,
    /// Per page, per paragraph slot height (already floored at the minimum).
    heights: Vec<Vec<f64>>,
}

impl LayoutSnapshot {
    pub fn empty(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            heights: Vec::new(),
        }
    }

    /// Measure every paragraph of `doc`.
    pub fn measure(doc: &DocumentState, geometry: PageGeometry, measurer: &dyn TextMeasurer) -> Self {
        let width = geometry.content_width();
        let heights: Vec<Vec<f64>> = doc
            .pages()
            .iter()
            .map(|page| {
                page.paragraphs()
                    .iter()
                    .map(|p| {
                        measurer
                            .paragraph_height(p, width)
                            .max(geometry.min_paragraph_height)
                    })
                    .collect()
            })
            .collect();
        trace!(target: "model.layout", pages = heights.len(), "snapshot");
        Self { geometry, heights }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn page_count(&self) -> usize {
        self.heights.len()
    }

    /// Sum of paragraph slot heights on `page`.
    pub fn content_height(&self, page: usize) -> Option<f64> {
        self.heights.get(page).map(|h| h.iter().sum())
    }

    fn paragraph_top(&self, page: usize, paragraph: usize) -> Option<f64> {
        let heights = self.heights.get(page)?;
        if paragraph >= heights.len() {
            return None;
        }
        Some(self.geometry.padding + heights[..paragraph].iter().sum::<f64>())
    }

    /// Map a canvas point to `(page, paragraph)`.
    ///
    /// A point up to `PAGE_HIT_SLOP` below a page's bottom belongs to it; in a
    /// page the top padding maps to paragraph 0 and anything below the last
    /// paragraph maps to the last. Below every page yields the last page with
    /// the `usize::MAX` "last paragraph" sentinel.
    pub fn hit_test(&self, point: Point) -> Option<Position> {
        if self.heights.is_empty() {
            return None;
        }
        for (pi, heights) in self.heights.iter().enumerate() {
            let rect = self.geometry.page_rect(pi);
            if point.y > rect.bottom() + PAGE_HIT_SLOP {
                continue;
            }
            let content_y = point.y - rect.y - self.geometry.padding;
            if content_y < 0.0 {
                return Some(Position::new(pi, 0));
            }
            let mut bottom = 0.0;
            for (i, h) in heights.iter().enumerate() {
                bottom += h;
                if content_y <= bottom {
                    return Some(Position::new(pi, i));
                }
            }
            return Some(Position::new(pi, heights.len().saturating_sub(1)));
        }
        Some(Position::new(self.heights.len() - 1, usize::MAX))
    }
}

impl TransformLookup for LayoutSnapshot {
    fn transform_to_ancestor(
        &self,
        node: LayoutNode,
        ancestor: LayoutNode,
    ) -> Option<AffineTransform> {
        match (node, ancestor) {
            (a, b) if a == b => Some(AffineTransform::IDENTITY),
            (LayoutNode::Page(p), LayoutNode::Canvas) => {
                (p < self.heights.len()).then(|| {
                    AffineTransform::translation(0.0, self.geometry.page_top(p))
                })
            }
            (LayoutNode::Paragraph { page, paragraph }, LayoutNode::Page(p)) if p == page => {
                let top = self.paragraph_top(page, paragraph)?;
                Some(AffineTransform::translation(self.geometry.padding, top))
            }
            (LayoutNode::Paragraph { page, .. }, LayoutNode::Canvas) => {
                let local = self.transform_to_ancestor(node, LayoutNode::Page(page))?;
                let outer = self.transform_to_ancestor(LayoutNode::Page(page), LayoutNode::Canvas)?;
                Some(local.then(&outer))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pages: Vec<Vec<f64>>) -> LayoutSnapshot {
        LayoutSnapshot {
            geometry: PageGeometry::default(),
            heights: pages,
        }
    }

    #[test]
    fn default_geometry_content_area() {
        let g = PageGeometry::default();
        assert_eq!(g.content_height(), 864.0);
        assert_eq!(g.content_width(), 624.0);
        assert_eq!(g.page_top(2), 2.0 * 1086.0);
    }

    #[test]
    fn transforms_compose_paragraph_to_canvas() {
        let snap = snapshot(vec![vec![20.0], vec![40.0, 30.0]]);
        let t = snap
            .transform_to_ancestor(
                LayoutNode::Paragraph {
                    page: 1,
                    paragraph: 1,
                },
                LayoutNode::Canvas,
            )
            .unwrap();
        let p = t.apply(Point::new(0.0, 0.0));
        assert_eq!(p, Point::new(96.0, 1086.0 + 96.0 + 40.0));
        assert!(
            snap.transform_to_ancestor(
                LayoutNode::Paragraph {
                    page: 3,
                    paragraph: 0
                },
                LayoutNode::Canvas
            )
            .is_none()
        );
    }

    #[test]
    fn apply_rect_translates() {
        let t = AffineTransform::translation(5.0, 7.0);
        assert_eq!(
            t.apply_rect(Rect::new(1.0, 1.0, 2.0, 3.0)),
            Rect::new(6.0, 8.0, 2.0, 3.0)
        );
        let s = AffineTransform {
            m11: 2.0,
            m22: 2.0,
            ..AffineTransform::IDENTITY
        };
        let composed = s.then(&t);
        assert_eq!(composed.apply(Point::new(1.0, 1.0)), Point::new(7.0, 9.0));
    }

    #[test]
    fn hit_test_maps_padding_slop_and_below() {
        let snap = snapshot(vec![vec![20.0, 20.0], vec![20.0]]);
        // top padding -> first paragraph
        assert_eq!(snap.hit_test(Point::new(10.0, 5.0)), Some(Position::new(0, 0)));
        // second paragraph slot
        assert_eq!(snap.hit_test(Point::new(10.0, 96.0 + 30.0)), Some(Position::new(0, 1)));
        // below content but within page -> last paragraph
        assert_eq!(snap.hit_test(Point::new(10.0, 900.0)), Some(Position::new(0, 1)));
        // within slop below page 0
        assert_eq!(snap.hit_test(Point::new(10.0, 1056.0 + 10.0)), Some(Position::new(0, 1)));
        // in the gap past the slop -> next page, top padding
        assert_eq!(snap.hit_test(Point::new(10.0, 1056.0 + 20.0)), Some(Position::new(1, 0)));
        // below all pages
        assert_eq!(
            snap.hit_test(Point::new(10.0, 5000.0)),
            Some(Position::new(1, usize::MAX))
        );
        assert_eq!(LayoutSnapshot::empty(PageGeometry::default()).hit_test(Point::default()), None);
    }
}
