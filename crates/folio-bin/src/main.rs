//! Folio headless driver.
//!
//! Loads a UTF-8 text file (or stdin) as committed input into an empty
//! document, lets the deferred pagination settle and prints the paginated
//! plain text followed by a status line.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{
    ActionObserver, DispatchResult, MemoryClipboard, dispatch, translate_command, translate_input,
};
use core_config::{Config, ConfigContext, load_from};
use core_events::{
    AsyncEventSource, CommandEvent, EVENT_CHANNEL_CAP, Event, EventSourceRegistry, InputEvent,
    TickEventSource,
};
use core_model::{EditorModel, MonospaceMeasurer};
use core_state::DocumentState;
use core_text::Alignment;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, Sender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Folio paginated document engine")]
struct Args {
    /// Text file to load. Reads stdin when omitted.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `folio.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn run(&mut self, args: &Args) -> Result<RuntimeContext> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let mut config = load_from(args.config.clone())?;
        config.apply_context(ConfigContext::default());
        let content = read_input(args.path.as_deref())?;
        let model = build_model(&config);

        info!(
            target: "runtime.startup",
            path = args.path.as_ref().map(|p| p.display().to_string()).as_deref(),
            size_bytes = content.len(),
            config_override = args.config.is_some(),
            content_height = config.page_geometry().content_height(),
            "bootstrap_complete"
        );
        Ok(RuntimeContext {
            model,
            config,
            content,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("folio.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "folio.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
            Ok(content)
        }
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("reading stdin")?;
            Ok(content)
        }
    }
}

fn build_model(config: &Config) -> EditorModel {
    let caret = config.caret_settings();
    EditorModel::new(
        DocumentState::new(config.default_style(), Alignment::Left),
        config.page_geometry(),
        caret,
        Box::new(MonospaceMeasurer::new(caret.line_height_factor)),
    )
}

struct RuntimeContext {
    model: EditorModel,
    config: Config,
    content: String,
}

/// Feeds the loaded text as one committed input, then asks for a layout
/// pass and shutdown.
struct DocumentFeedSource {
    content: String,
}

impl AsyncEventSource for DocumentFeedSource {
    fn name(&self) -> &'static str {
        "document_feed"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let events = [
                Event::Input(InputEvent::TextCommit(self.content)),
                Event::LayoutReady,
                Event::Shutdown,
            ];
            for ev in events {
                if tx.send(ev).await.is_err() {
                    break;
                }
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    ActionQuit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::ActionQuit => "action_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

struct EditorRuntime {
    model: EditorModel,
    clipboard: MemoryClipboard,
    observers: Vec<Box<dyn ActionObserver>>,
    rx: mpsc::Receiver<Event>,
    tx: Option<Sender<Event>>,
    source_handles: Vec<JoinHandle<()>>,
}

impl EditorRuntime {
    fn new(
        model: EditorModel,
        tx: Sender<Event>,
        rx: mpsc::Receiver<Event>,
        source_handles: Vec<JoinHandle<()>>,
    ) -> Self {
        Self {
            model,
            clipboard: MemoryClipboard::new(),
            observers: Vec::new(),
            rx,
            tx: Some(tx),
            source_handles,
        }
    }

    async fn run(&mut self) -> Result<ShutdownReason> {
        let span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter = span.enter();

        let mut reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match event {
                Event::Input(input) => self.handle_input_event(&input),
                Event::Command(cmd) => self.handle_command_event(cmd),
                Event::LayoutReady => self.handle_layout_ready(),
                Event::Tick => self.handle_tick(),
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };
            if let LoopControl::Break { reason: r } = control {
                reason = r;
                break;
            }
        }

        self.rx.close();
        self.finalize_shutdown(reason).await;
        Ok(reason)
    }

    fn handle_input_event(&mut self, input: &InputEvent) -> LoopControl {
        let Some(action) = translate_input(input) else {
            return LoopControl::Continue;
        };
        let result = dispatch(action, &mut self.model, &mut self.clipboard, &self.observers);
        self.apply(result)
    }

    fn handle_command_event(&mut self, cmd: CommandEvent) -> LoopControl {
        let action = translate_command(cmd);
        let result = dispatch(action, &mut self.model, &mut self.clipboard, &self.observers);
        self.apply(result)
    }

    fn apply(&self, result: DispatchResult) -> LoopControl {
        if result.quit {
            return LoopControl::Break {
                reason: ShutdownReason::ActionQuit,
            };
        }
        LoopControl::Continue
    }

    /// One deferred layout pass. Headless there is no host to report the
    /// next measurement, so the runtime asks for another pass itself while
    /// work remains.
    fn handle_layout_ready(&mut self) -> LoopControl {
        let report = self.model.run_layout_pass();
        trace!(target: "runtime", checked = report.checked, migrated = report.migrated, "layout_ready");
        if self.model.pending_tasks() > 0
            && let Some(tx) = &self.tx
            && tx.try_send(Event::LayoutReady).is_err()
        {
            debug!(target: "runtime", "layout_ready_requeue_skipped");
        }
        LoopControl::Continue
    }

    fn handle_tick(&mut self) -> LoopControl {
        if self.model.tick(Instant::now()) {
            trace!(target: "runtime", visible = self.model.visible_caret().is_some(), "caret_blink");
        }
        LoopControl::Continue
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", reason = reason.as_str(), stage = "begin", "shutdown_stage");
        // deferred checks still queued run now so the printed document is settled
        let passes = self.model.settle();
        if self.model.pending_tasks() > 0 {
            warn!(target: "runtime.shutdown", pending = self.model.pending_tasks(), "layout_not_settled");
        }
        trace!(target: "runtime.shutdown", passes, "settled");
        drop(self.tx.take());

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(target: "runtime.shutdown", "event_source_task_stopped"),
                Ok(Err(err)) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", "event_source_task_cancelled")
                }
                Ok(Err(err)) => error!(target: "runtime.shutdown", ?err, "event_source_task_error"),
                Err(_) => warn!(target: "runtime.shutdown", "event_source_task_timeout"),
            }
        }
        info!(target: "runtime.shutdown", reason = reason.as_str(), stage = "complete", "shutdown_stage");
    }
}

fn render_summary(model: &EditorModel, config: &Config) -> String {
    let state = model.state();
    format!(
        "{}\n\n[{} | {} pages | {} words]",
        state.plain_text(config.page_marker()),
        state.page_label(),
        state.page_count(),
        state.word_count()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let RuntimeContext {
        model,
        config,
        content,
    } = startup.run(&args)?;

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let mut registry = EventSourceRegistry::new();
    let blink = model.caret_settings().blink_interval;
    if !blink.is_zero() {
        registry.register(TickEventSource::new(blink));
    }
    registry.register(DocumentFeedSource { content });
    let source_handles = registry.spawn_all(&tx);

    let mut runtime = EditorRuntime::new(model, tx, rx, source_handles);
    runtime.run().await?;
    println!("{}", render_summary(&runtime.model, &config));
    Ok(())
}
