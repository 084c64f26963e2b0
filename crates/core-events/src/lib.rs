//! Core event types, async event sources and the deferred layout queue.

use core_text::{Alignment, Color};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

pub mod layout_queue;

pub use layout_queue::{LayoutQueue, LayoutTask};

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// One bounded mpsc channel feeds the editor loop. Producers (host input bridge, tick source) await
// `send`, so a slow consumer applies backpressure instead of dropping edits.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 4096;

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Command(CommandEvent),
    /// The host finished a measurement pass; deferred layout tasks may run.
    LayoutReady,
    /// Periodic tick driving caret blink.
    Tick,
    Shutdown,
}

/// Normalized input events delivered by the host surface.
///
/// Text payloads are never logged verbatim; consumers log only lengths.
#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Committed text (typing, IME, paste). May contain line separators.
    TextCommit(String),
    Pointer(PointerEvent),
    /// Character-precision selection reported by the host for one
    /// paragraph while it owns input focus.
    SelectChars {
        page: usize,
        paragraph: usize,
        start: usize,
        end: usize,
    },
}

/// Toolbar / menu commands surfaced by the host chrome.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEvent {
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    ToggleStrikethrough,
    SetForeground(Color),
    /// `None` clears the background.
    SetBackground(Option<Color>),
    SetFontFamily(String),
    SetFontSize(f64),
    SetAlignment(Alignment),
    SelectAll,
    Copy,
    Cut,
    Paste,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

/// Pointer event in canvas coordinates (pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    pub mods: KeyModifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            mods: KeyModifiers::empty(),
        }
    }

    pub fn with_mods(mut self, mods: KeyModifiers) -> Self {
        self.mods = mods;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Press,
    Move,
    Release,
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------
// Each source owns one background task pushing `Event`s into the shared channel and must exit
// promptly once `send` fails (consumer dropped).

/// Trait implemented by any async event producer.
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task.
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at startup.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, returning their JoinHandles. Each source receives its own
    /// `Sender` clone; the registry is drained so a second call spawns nothing.
    ///
    /// During shutdown the caller should drop its last `Sender` before awaiting the handles so
    /// sources observe the closed channel.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

/// Emits `Event::Tick` every configured interval (drives caret blink).
pub struct TickEventSource {
    interval: Duration,
}

impl TickEventSource {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            loop {
                interval.tick().await;
                if tx.send(Event::Tick).await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display_mentions_code() {
        let k = KeyEvent::ctrl('b');
        let s = format!("{}", k);
        assert!(s.contains("Char"));
        assert!(s.contains("CTRL"));
    }

    #[test]
    fn pointer_event_builder_sets_mods() {
        let ev = PointerEvent::new(PointerKind::Press, 10.0, 20.0).with_mods(KeyModifiers::SHIFT);
        assert_eq!(ev.mods, KeyModifiers::SHIFT);
        assert_eq!(ev.kind, PointerKind::Press);
    }
}

#[cfg(test)]
mod tests_async_sources {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::mpsc;

    struct OneShotSource;

    impl AsyncEventSource for OneShotSource {
        fn name(&self) -> &'static str {
            "one_shot"
        }
        fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
            tokio::spawn(async move {
                let _ = tx.send(Event::LayoutReady).await;
            })
        }
    }

    #[tokio::test]
    async fn registry_spawns_and_emits() {
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let mut reg = EventSourceRegistry::new();
        reg.register(OneShotSource);
        reg.register(TickEventSource::new(Duration::from_millis(10)));
        assert_eq!(reg.len(), 2);
        let handles = reg.spawn_all(&tx);
        assert!(reg.is_empty());

        let mut got_layout = false;
        let mut got_tick = false;
        let start = std::time::Instant::now();
        while start.elapsed() < Duration::from_millis(200) && (!got_layout || !got_tick) {
            if let Ok(Some(ev)) = tokio::time::timeout(Duration::from_millis(5), rx.recv()).await {
                match ev {
                    Event::LayoutReady => got_layout = true,
                    Event::Tick => got_tick = true,
                    _ => {}
                }
            }
        }
        assert!(got_layout, "expected one-shot source to emit");
        assert!(got_tick, "expected tick source to emit");

        drop(tx);
        drop(rx);
        for handle in handles {
            let _ = tokio::time::timeout(Duration::from_millis(20), handle).await;
        }
    }

    struct CloseWatcher {
        flag: Arc<AtomicBool>,
    }

    impl AsyncEventSource for CloseWatcher {
        fn name(&self) -> &'static str {
            "close_watcher"
        }
        fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
            let flag = self.flag;
            tokio::spawn(async move {
                tx.closed().await;
                flag.store(true, Ordering::SeqCst);
            })
        }
    }

    #[tokio::test]
    async fn sources_exit_on_channel_drop() {
        let (tx, rx) = mpsc::channel::<Event>(8);
        let mut reg = EventSourceRegistry::new();
        let flag = Arc::new(AtomicBool::new(false));
        reg.register(CloseWatcher { flag: flag.clone() });
        let handles = reg.spawn_all(&tx);
        drop(tx);
        drop(rx);
        for handle in handles {
            match tokio::time::timeout(Duration::from_millis(50), handle).await {
                Ok(join_res) => join_res.expect("source task should exit cleanly"),
                Err(_) => panic!("source task did not observe channel closure"),
            }
        }
        assert!(flag.load(Ordering::SeqCst));
    }
}
