//! NFC normalization plus grapheme segmentation for incoming text.
//!
//! Text arriving from the host (typing, IME commit, paste) is normalized once
//! here before it reaches run storage, so composed and decomposed input
//! produce identical runs. Segments carry char offsets (the unit used by
//! paragraph offsets) and a cell width for the headless measurer. Callers
//! must not log segment contents.

use crate::egc_width;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub cluster: String,
    /// Character offset of the cluster start (inclusive).
    pub start: usize,
    /// Character offset of the cluster end (exclusive).
    pub end: usize,
    pub width: u16,
}

/// NFC form of `input`.
pub fn normalize(input: &str) -> String {
    input.nfc().collect()
}

/// Segment already-normalized text.
pub fn segment(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    for g in text.graphemes(true) {
        let chars = g.chars().count();
        out.push(Segment {
            cluster: g.to_string(),
            start: offset,
            end: offset + chars,
            width: egc_width(g),
        });
        offset += chars;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_and_decomposed_normalize_equal() {
        let n1 = normalize("e\u{0301}");
        let n2 = normalize("\u{00E9}");
        assert_eq!(n1, n2);
        let (s1, s2) = (segment(&n1), segment(&n2));
        assert_eq!(s1, s2);
        assert_eq!(s1.len(), 1);
        assert_eq!(s1[0].end, 1);
    }

    #[test]
    fn segments_cover_text_contiguously() {
        let text = "漢a👨\u{200D}👩\u{200D}👧b";
        let segs = segment(text);
        assert_eq!(segs.len(), 4);
        let mut prev = 0;
        let mut joined = String::new();
        for s in &segs {
            assert_eq!(s.start, prev);
            prev = s.end;
            joined.push_str(&s.cluster);
        }
        assert_eq!(joined, text);
        assert_eq!(prev, text.chars().count());
        assert_eq!(segs[2].width, 2);
    }
}
