//! Synchronous editing operations.
//!
//! Typing, Enter and Backspace act at the end of the current paragraph.
//! Incoming text is NFC-normalized and split on `\r\n`, `\r` and `\n`: the
//! first line extends the current paragraph, every further line opens a new
//! paragraph directly after it.

use crate::{DocumentState, InputInterest, Position};
use core_text::segment::normalize;
use core_text::{Paragraph, split_lines};
use tracing::{debug, trace};

impl DocumentState {
    /// Insert text at the caret, replacing any selection first.
    pub fn insert_text(&mut self, text: &str) {
        self.revalidate();
        if text.is_empty() {
            return;
        }
        if self.has_selection() {
            self.delete_selection();
        }
        let text = normalize(text);
        let style = self.pending_style.clone();
        let lines = split_lines(&text);
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                self.open_paragraph_after_current();
            }
            self.current_paragraph_mut().append_text(line, &style);
        }
        self.selection.reset();
        self.mark_grown(self.current_page);
        trace!(
            target: "state.edit",
            len = text.len(),
            lines = lines.len(),
            page = self.current_page,
            paragraph = self.current_paragraph,
            "insert_text"
        );
    }

    /// Enter: replace any selection, then open a new paragraph after the
    /// current one using the pending alignment.
    pub fn insert_paragraph(&mut self) {
        self.revalidate();
        if self.has_selection() {
            self.delete_selection();
        }
        self.open_paragraph_after_current();
        self.mark_grown(self.current_page);
        trace!(target: "state.edit", page = self.current_page, paragraph = self.current_paragraph, "insert_paragraph");
    }

    fn open_paragraph_after_current(&mut self) {
        self.revalidate();
        let para = Paragraph::new(self.pending_style.clone(), self.pending_alignment);
        self.routes.attach(para.id(), InputInterest::all());
        let at = self.current_paragraph + 1;
        self.pages[self.current_page].insert(at, para);
        self.current_paragraph = at;
    }

    /// Backspace: delete the selection if there is one, otherwise remove the
    /// last grapheme of the current paragraph. An already-empty paragraph is
    /// removed (caret to the previous paragraph) unless it is the first of
    /// the first page; a blank non-first page is removed entirely.
    pub fn backspace(&mut self) {
        self.revalidate();
        if self.has_selection() {
            self.delete_selection();
            return;
        }
        let Position { page, paragraph } = self.current();
        let para = self.current_paragraph_mut();
        para.clear_saved_selection();
        if let Some(removed) = para.remove_last_grapheme() {
            trace!(target: "state.edit", removed = removed.len(), "backspace");
            return;
        }
        if paragraph > 0 {
            if let Some(gone) = self.pages[page].remove(paragraph) {
                self.routes.detach(gone.id());
            }
            self.current_paragraph = paragraph - 1;
            debug!(target: "state.edit", page, paragraph, "backspace_remove_paragraph");
        } else if page > 0 && self.pages[page].is_blank() {
            self.remove_page(page);
            self.current_page = page - 1;
            self.current_paragraph = usize::MAX;
            self.revalidate();
            debug!(target: "state.edit", page, "backspace_remove_page");
        }
    }

    /// Delete key: removes the selection when present, otherwise no-op.
    pub fn delete_forward(&mut self) {
        self.revalidate();
        if self.has_selection() {
            self.delete_selection();
        }
    }

    /// Delete every selected range. Paragraphs emptied by the deletion are
    /// removed unless they are the last of their page; non-first pages left
    /// blank are removed and the rest renumbered. The caret lands on the
    /// first affected paragraph. Returns false when nothing was selected.
    pub fn delete_selection(&mut self) -> bool {
        self.revalidate();
        let mut first: Option<Position> = None;
        let mut touched_pages = Vec::new();
        let mut removed_chars = 0usize;
        for (pi, page) in self.pages.iter_mut().enumerate() {
            let mut emptied = Vec::new();
            let mut touched = false;
            for (i, para) in page.paragraphs_mut().iter_mut().enumerate() {
                match para.delete_selection() {
                    Some(removed) => {
                        removed_chars += removed.chars().count();
                        first.get_or_insert(Position::new(pi, i));
                        touched = true;
                        if para.is_empty() {
                            emptied.push(i);
                        }
                    }
                    None => para.clear_selection(),
                }
            }
            for i in emptied.into_iter().rev() {
                if let Some(gone) = page.remove(i) {
                    self.routes.detach(gone.id());
                }
            }
            if touched {
                touched_pages.push(pi);
            }
        }
        self.selection.reset();
        let Some(mut caret) = first else {
            return false;
        };
        for pi in touched_pages.into_iter().rev() {
            if pi > 0 && self.pages[pi].is_blank() {
                self.remove_page(pi);
                if caret.page == pi {
                    caret = Position::new(pi - 1, usize::MAX);
                }
            }
        }
        self.set_current(caret);
        debug!(
            target: "state.edit",
            removed = removed_chars,
            pages = self.pages.len(),
            "delete_selection"
        );
        true
    }

    /// Remove a page and release its paragraphs' subscriptions.
    fn remove_page(&mut self, idx: usize) {
        if self.pages.len() <= 1 || idx >= self.pages.len() {
            return;
        }
        let page = self.pages.remove(idx);
        for para in page.paragraphs() {
            self.routes.detach(para.id());
        }
        self.renumber_pages();
        self.grown_pages.retain(|&p| p < self.pages.len());
    }
}

#[cfg(test)]
mod tests {
    use crate::{DocumentState, Position};
    use core_text::Style;
    use pretty_assertions::assert_eq;

    fn texts(doc: &DocumentState) -> Vec<Vec<String>> {
        doc.pages()
            .iter()
            .map(|p| p.paragraphs().iter().map(|x| x.text()).collect())
            .collect()
    }

    #[test]
    fn typing_with_same_style_extends_one_run() {
        let mut doc = DocumentState::default();
        doc.insert_text("Hello");
        doc.insert_text(" World");
        let runs = doc.current_paragraph().runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello World");
    }

    #[test]
    fn toggling_bold_mid_typing_starts_a_new_run() {
        let mut doc = DocumentState::default();
        doc.toggle_bold();
        doc.insert_text("Hello");
        doc.toggle_bold();
        doc.insert_text(" World");
        let runs = doc.current_paragraph().runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Hello");
        assert!(runs[0].style.is_bold());
        assert_eq!(runs[1].text, " World");
        assert_eq!(runs[1].style, Style::default());
    }

    #[test]
    fn multi_line_text_becomes_paragraphs() {
        let mut doc = DocumentState::default();
        doc.insert_text("A\nB\r\nC");
        assert_eq!(texts(&doc), vec![vec!["A", "B", "C"]]);
        assert_eq!(doc.current(), Position::new(0, 2));
        assert_eq!(doc.routes().len(), 3);
        assert_eq!(doc.take_grown_pages(), vec![0]);
        assert!(doc.take_grown_pages().is_empty());
    }

    #[test]
    fn inserted_text_is_nfc_normalized() {
        let mut doc = DocumentState::default();
        doc.insert_text("e\u{0301}");
        assert_eq!(doc.current_paragraph().text(), "\u{00E9}");
    }

    #[test]
    fn enter_inserts_after_current_paragraph() {
        let mut doc = DocumentState::default();
        doc.insert_text("one\ntwo");
        doc.set_current(Position::new(0, 0));
        doc.insert_paragraph();
        doc.insert_text("mid");
        assert_eq!(texts(&doc), vec![vec!["one", "mid", "two"]]);
    }

    #[test]
    fn backspace_trims_then_removes_empty_paragraph() {
        let mut doc = DocumentState::default();
        doc.insert_text("ab\nc");
        doc.backspace();
        assert_eq!(texts(&doc), vec![vec!["ab", ""]]);
        doc.backspace();
        assert_eq!(texts(&doc), vec![vec!["ab"]]);
        assert_eq!(doc.current(), Position::new(0, 0));
        doc.backspace();
        doc.backspace();
        doc.backspace();
        assert_eq!(texts(&doc), vec![vec![""]]);
        assert_eq!(doc.routes().len(), 1);
    }

    #[test]
    fn backspace_on_blank_trailing_page_removes_it() {
        let mut doc = DocumentState::default();
        doc.insert_text("a\n");
        doc.migrate_last_paragraph(0);
        assert_eq!(doc.page_count(), 2);
        doc.backspace();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.current(), Position::new(0, 0));
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut doc = DocumentState::default();
        doc.insert_text("x👍🏽");
        doc.backspace();
        assert_eq!(doc.current_paragraph().text(), "x");
    }

    #[test]
    fn delete_selection_removes_emptied_paragraphs_and_pages() {
        let mut doc = DocumentState::default();
        doc.insert_text("keep\ngone1\ngone2\nlast");
        doc.migrate_last_paragraph(0);
        doc.set_current(Position::new(0, 0));
        // select from paragraph 1 through the end of page 1
        doc.pointer_press(Position::new(0, 1), None, false);
        doc.pointer_move(Position::new(1, usize::MAX), None);
        doc.pointer_release();
        assert_eq!(doc.selected_text(), "gone1\ngone2\nlast");
        assert!(doc.delete_selection());
        assert_eq!(texts(&doc), vec![vec!["keep"]]);
        assert_eq!(doc.current(), Position::new(0, 0));
        assert_eq!(doc.routes().len(), 1);
        assert!(!doc.has_selection());
        assert!(!doc.delete_selection());
    }

    #[test]
    fn delete_partial_selection_keeps_paragraph() {
        let mut doc = DocumentState::default();
        doc.insert_text("Hello World");
        doc.select_chars(Position::new(0, 0), 5, 11);
        doc.delete_forward();
        assert_eq!(texts(&doc), vec![vec!["Hello"]]);
    }

    #[test]
    fn typing_replaces_selection() {
        let mut doc = DocumentState::default();
        doc.insert_text("Hello World");
        doc.select_chars(Position::new(0, 0), 6, 11);
        doc.insert_text("there");
        assert_eq!(doc.current_paragraph().text(), "Hello there");
    }
}
