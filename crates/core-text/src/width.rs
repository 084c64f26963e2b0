//! Display width of a grapheme cluster, in monospace cells.
//!
//! All width decisions in the workspace flow through `egc_width`; the
//! headless measurer converts cells to pixels. The baseline comes from
//! `unicode-width`, with two corrections for clusters that crate
//! under-measures: emoji presentation sequences (VS16) and keycaps are
//! widened to 2, and a cluster never measures less than its widest scalar.

use unicode_width::UnicodeWidthStr;

const VS16: char = '\u{FE0F}';
const KEYCAP: char = '\u{20E3}';
const ZWJ: char = '\u{200D}';

/// Width in cells of one extended grapheme cluster. Control-only clusters
/// measure 0; any other non-empty cluster measures at least 1.
pub fn egc_width(cluster: &str) -> u16 {
    if cluster.is_empty() {
        return 0;
    }
    if cluster.chars().all(char::is_control) {
        return 0;
    }
    if cluster.contains(KEYCAP) || (cluster.contains(VS16) && cluster.chars().count() > 1) {
        return 2;
    }
    if cluster.contains(ZWJ) {
        return 2;
    }
    let base = UnicodeWidthStr::width(cluster).max(1);
    base.min(2) as u16
}
