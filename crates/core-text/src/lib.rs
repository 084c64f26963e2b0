//! Rich-text primitives: styles, runs, paragraphs and the formatting engine.
//!
//! Offsets used throughout the workspace are *character* offsets (Unicode
//! scalar values) into a paragraph's logical text, i.e. the concatenation of
//! its run texts. The helpers in this module convert between character
//! offsets and byte offsets so no caller slices strings by hand.

pub mod format;
pub mod paragraph;
pub mod run;
pub mod segment;
pub mod style;
pub mod width;

pub use paragraph::{Paragraph, ParagraphId, SELECTION_END};
pub use run::Run;
pub use style::{Alignment, Color, Slant, Style, StyleParseError, Weight};
pub use width::egc_width;

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the character at `char_idx`, clamped to `s.len()`.
pub fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Split `s` at a character offset (clamped).
pub fn split_at_char(s: &str, char_idx: usize) -> (&str, &str) {
    s.split_at(char_to_byte(s, char_idx))
}

/// Substring between two character offsets (both clamped, order-independent).
pub fn char_slice(s: &str, a: usize, b: usize) -> &str {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let start = char_to_byte(s, lo);
    let end = char_to_byte(s, hi);
    &s[start..end]
}

/// Split text on any of `\r\n`, `\r`, `\n`. Always yields at least one line;
/// a trailing separator yields a trailing empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let bytes = text.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                out.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            b'\n' => {
                out.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(&text[start..]);
    out
}

/// Grapheme helpers operating on a single run or paragraph string.
pub mod grapheme {
    use unicode_segmentation::UnicodeSegmentation;

    /// Previous grapheme boundary in bytes (0 if already at or below the first boundary).
    pub fn prev_boundary(line: &str, byte: usize) -> usize {
        if byte == 0 || byte > line.len() {
            return 0;
        }
        let mut last = 0;
        for (idx, _) in line.grapheme_indices(true) {
            if idx >= byte {
                break;
            }
            last = idx;
        }
        last
    }

    /// Count whitespace-separated words.
    pub fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_offsets_respect_multibyte_text() {
        let s = "añb€";
        assert_eq!(char_len(s), 4);
        assert_eq!(char_to_byte(s, 2), 3);
        assert_eq!(char_to_byte(s, 99), s.len());
        assert_eq!(split_at_char(s, 2), ("añ", "b€"));
        assert_eq!(char_slice(s, 3, 1), "ñb");
    }

    #[test]
    fn split_lines_handles_all_separators() {
        assert_eq!(split_lines("A\nB\r\nC\rD"), vec!["A", "B", "C", "D"]);
        assert_eq!(split_lines("plain"), vec!["plain"]);
        assert_eq!(split_lines("x\n"), vec!["x", ""]);
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("\r\n\r\n"), vec!["", "", ""]);
    }

    #[test]
    fn prev_boundary_skips_whole_clusters() {
        assert_eq!(grapheme::prev_boundary("abe\u{0301}", 5), 2);
        assert_eq!(grapheme::prev_boundary("abc", 3), 2);
        assert_eq!(grapheme::prev_boundary("abc", 0), 0);
        assert_eq!(grapheme::prev_boundary("", 0), 0);
    }

    #[test]
    fn word_count_ignores_runs_of_whitespace() {
        assert_eq!(grapheme::word_count("  one\ttwo\n\nthree  "), 3);
        assert_eq!(grapheme::word_count("   "), 0);
    }
}
