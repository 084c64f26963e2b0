//! Page: an ordered, exclusively owned list of paragraphs.

use core_text::{Alignment, Paragraph, Style};

/// A page always holds at least one paragraph. `index` mirrors the page's
/// position in the document and is rewritten by `DocumentState` whenever
/// pages are inserted or removed.
#[derive(Debug)]
pub struct Page {
    paragraphs: Vec<Paragraph>,
    index: usize,
}

impl Page {
    /// New page with one empty paragraph.
    pub fn new(index: usize, style: Style, alignment: Alignment) -> Self {
        Self {
            paragraphs: vec![Paragraph::new(style, alignment)],
            index,
        }
    }

    /// Page seeded with an existing paragraph (migration target).
    pub fn with_paragraph(index: usize, paragraph: Paragraph) -> Self {
        Self {
            paragraphs: vec![paragraph],
            index,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraphs_mut(&mut self) -> &mut [Paragraph] {
        &mut self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// True when the page holds a single paragraph with no text.
    pub fn is_blank(&self) -> bool {
        self.paragraphs.len() == 1 && self.paragraphs[0].is_empty()
    }

    pub fn paragraph(&self, idx: usize) -> Option<&Paragraph> {
        self.paragraphs.get(idx)
    }

    pub fn paragraph_mut(&mut self, idx: usize) -> Option<&mut Paragraph> {
        self.paragraphs.get_mut(idx)
    }

    /// Clamp a paragraph index (including the `usize::MAX` "last" sentinel).
    pub fn clamp_paragraph(&self, idx: usize) -> usize {
        idx.min(self.paragraphs.len().saturating_sub(1))
    }

    pub(crate) fn insert(&mut self, idx: usize, paragraph: Paragraph) {
        let idx = idx.min(self.paragraphs.len());
        self.paragraphs.insert(idx, paragraph);
    }

    /// Remove a paragraph unless it is the page's last one.
    pub(crate) fn remove(&mut self, idx: usize) -> Option<Paragraph> {
        if self.paragraphs.len() <= 1 || idx >= self.paragraphs.len() {
            return None;
        }
        Some(self.paragraphs.remove(idx))
    }

    /// Detach the final paragraph for migration. Refuses when only one remains.
    pub(crate) fn pop_last(&mut self) -> Option<Paragraph> {
        if self.paragraphs.len() <= 1 {
            return None;
        }
        self.paragraphs.pop()
    }

    /// Plain text of the page, paragraphs joined by `\n`.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_selection(&self) -> bool {
        self.paragraphs.iter().any(Paragraph::has_selection)
    }
}
