#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{
    Action, Clipboard, DispatchResult, MemoryClipboard, dispatch, translate_command,
    translate_input,
};
use core_events::{CommandEvent, InputEvent, KeyCode, KeyEvent, KeyModifiers, PointerEvent, PointerKind};
use core_model::EditorModel;
use core_state::DocumentState;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// Headless editor wired to a clipboard, fed through the same translation
/// path the runtime uses.
pub struct Harness<C: Clipboard = MemoryClipboard> {
    pub model: EditorModel,
    pub clipboard: C,
}

impl Harness<MemoryClipboard> {
    pub fn new() -> Self {
        Self::with_clipboard(MemoryClipboard::new())
    }
}

impl<C: Clipboard> Harness<C> {
    pub fn with_clipboard(clipboard: C) -> Self {
        Self {
            model: EditorModel::headless(DocumentState::default()),
            clipboard,
        }
    }

    pub fn apply(&mut self, action: Action) -> DispatchResult {
        dispatch(action, &mut self.model, &mut self.clipboard, &[])
    }

    pub fn input(&mut self, ev: InputEvent) -> DispatchResult {
        match translate_input(&ev) {
            Some(action) => self.apply(action),
            None => DispatchResult::clean(),
        }
    }

    pub fn command(&mut self, cmd: CommandEvent) -> DispatchResult {
        self.apply(translate_command(cmd))
    }

    pub fn key(&mut self, code: KeyCode) -> DispatchResult {
        self.input(InputEvent::Key(KeyEvent::plain(code)))
    }

    pub fn ctrl(&mut self, c: char) -> DispatchResult {
        self.input(InputEvent::Key(KeyEvent::ctrl(c)))
    }

    /// Type `text` one key at a time (`\n` becomes Enter).
    pub fn type_keys(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.key(KeyCode::Enter);
            } else {
                self.key(KeyCode::Char(c));
            }
        }
    }

    pub fn commit(&mut self, text: &str) -> DispatchResult {
        self.input(InputEvent::TextCommit(text.to_string()))
    }

    pub fn select_chars(&mut self, page: usize, paragraph: usize, start: usize, end: usize) {
        self.input(InputEvent::SelectChars {
            page,
            paragraph,
            start,
            end,
        });
    }

    pub fn pointer(&mut self, kind: PointerKind, x: f64, y: f64, shift: bool) -> DispatchResult {
        let mods = if shift {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::empty()
        };
        self.input(InputEvent::Pointer(PointerEvent::new(kind, x, y).with_mods(mods)))
    }

    pub fn settle(&mut self) -> usize {
        self.model.settle()
    }

    /// Paragraph texts of every page.
    pub fn texts(&self) -> Vec<Vec<String>> {
        self.model
            .state()
            .pages()
            .iter()
            .map(|p| p.paragraphs().iter().map(|para| para.text()).collect())
            .collect()
    }
}

#[derive(Clone)]
pub struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl BufferWriter {
    pub fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
        let buf = Arc::new(Mutex::new(Vec::new()));
        (Self { inner: buf.clone() }, buf)
    }
}

pub struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}
