//! Configuration loading and parsing.
//!
//! Parses `folio.toml` (or an override path provided by the binary) into
//! four sections: `[page]`, `[style]`, `[caret]` and `[text]`. Every field
//! has a default, unknown fields are ignored and a file that fails to parse
//! falls back to the defaults with a warning.
//!
//! Page geometry is validated in `Config::apply_context`: a padding that
//! would leave less than the minimum content box is clamped. The raw parsed
//! value is retained so a later context (e.g. a different minimum) can
//! re-clamp.

use anyhow::Result;
use core_model::{CaretSettings, PageGeometry};
use core_state::DEFAULT_PAGE_MARKER;
use core_text::{Color, Style};
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

/// File name looked up in the working directory and the platform config dir.
pub const CONFIG_FILE_NAME: &str = "folio.toml";

/// Minimum content box the page geometry must leave after padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigContext {
    pub min_content_width: f64,
    pub min_content_height: f64,
}

impl Default for ConfigContext {
    fn default() -> Self {
        Self::new(1.0, PageSection::default_min_paragraph_height())
    }
}

impl ConfigContext {
    pub fn new(min_content_width: f64, min_content_height: f64) -> Self {
        Self {
            min_content_width,
            min_content_height,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PageSection {
    #[serde(default = "PageSection::default_width")]
    pub width: f64,
    #[serde(default = "PageSection::default_height")]
    pub height: f64,
    #[serde(default = "PageSection::default_padding")]
    pub padding: f64,
    #[serde(default = "PageSection::default_spacing")]
    pub spacing: f64,
    #[serde(default = "PageSection::default_min_paragraph_height")]
    pub min_paragraph_height: f64,
}

impl Default for PageSection {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            padding: Self::default_padding(),
            spacing: Self::default_spacing(),
            min_paragraph_height: Self::default_min_paragraph_height(),
        }
    }
}

impl PageSection {
    const fn default_width() -> f64 {
        816.0
    }
    const fn default_height() -> f64 {
        1056.0
    }
    const fn default_padding() -> f64 {
        96.0
    }
    const fn default_spacing() -> f64 {
        30.0
    }
    const fn default_min_paragraph_height() -> f64 {
        20.0
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StyleSection {
    #[serde(default = "StyleSection::default_font_family")]
    pub font_family: String,
    #[serde(default = "StyleSection::default_font_size")]
    pub font_size: f64,
    #[serde(default = "StyleSection::default_foreground")]
    pub foreground: String,
    #[serde(default)]
    pub background: Option<String>,
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            font_family: Self::default_font_family(),
            font_size: Self::default_font_size(),
            foreground: Self::default_foreground(),
            background: None,
        }
    }
}

impl StyleSection {
    fn default_font_family() -> String {
        Style::default().font_family
    }
    fn default_font_size() -> f64 {
        Style::default().font_size
    }
    fn default_foreground() -> String {
        "#000000".to_string()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CaretSection {
    #[serde(default = "CaretSection::default_blink_ms")]
    pub blink_ms: u64,
    #[serde(default = "CaretSection::default_line_height_factor")]
    pub line_height_factor: f64,
    #[serde(default = "CaretSection::default_fallback_line_height")]
    pub fallback_line_height: f64,
}

impl Default for CaretSection {
    fn default() -> Self {
        Self {
            blink_ms: Self::default_blink_ms(),
            line_height_factor: Self::default_line_height_factor(),
            fallback_line_height: Self::default_fallback_line_height(),
        }
    }
}

impl CaretSection {
    const fn default_blink_ms() -> u64 {
        500
    }
    const fn default_line_height_factor() -> f64 {
        1.2
    }
    const fn default_fallback_line_height() -> f64 {
        18.0
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TextSection {
    #[serde(default = "TextSection::default_page_marker")]
    pub page_marker: String,
}

impl Default for TextSection {
    fn default() -> Self {
        Self {
            page_marker: Self::default_page_marker(),
        }
    }
}

impl TextSection {
    fn default_page_marker() -> String {
        DEFAULT_PAGE_MARKER.to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub page: PageSection,
    #[serde(default)]
    pub style: StyleSection,
    #[serde(default)]
    pub caret: CaretSection,
    #[serde(default)]
    pub text: TextSection,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
    /// Page geometry after `apply_context` clamping.
    pub effective_page: PageGeometry,
}

impl Default for Config {
    fn default() -> Self {
        let file = ConfigFile::default();
        let effective_page = raw_geometry(&file.page);
        Self {
            raw: None,
            file,
            effective_page,
        }
    }
}

fn raw_geometry(page: &PageSection) -> PageGeometry {
    PageGeometry {
        width: page.width,
        height: page.height,
        padding: page.padding,
        spacing: page.spacing,
        min_paragraph_height: page.min_paragraph_height,
    }
}

/// Config path following platform conventions: `folio.toml` in the working
/// directory wins, then `<config_dir>/folio/folio.toml`.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("folio").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let effective_page = raw_geometry(&file.page);
            Ok(Config {
                raw: Some(content),
                file,
                effective_page,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Validate page geometry against `ctx`, clamping the padding so the
    /// content box is at least the context minimum. Returns the effective
    /// geometry.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> PageGeometry {
        let defaults = PageSection::default();
        let page = &self.file.page;
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let width = positive(page.width, defaults.width);
        let height = positive(page.height, defaults.height);
        let spacing = if page.spacing.is_finite() { page.spacing.max(0.0) } else { 0.0 };
        let min_paragraph_height =
            positive(page.min_paragraph_height, defaults.min_paragraph_height);

        let raw = if page.padding.is_finite() { page.padding.max(0.0) } else { 0.0 };
        let max = ((width - ctx.min_content_width) / 2.0)
            .min((height - ctx.min_content_height) / 2.0)
            .max(0.0);
        let padding = raw.min(max);
        if padding != page.padding {
            info!(
                target: "config",
                raw = page.padding,
                clamped = padding,
                max,
                width,
                height,
                min_content_width = ctx.min_content_width,
                min_content_height = ctx.min_content_height,
                "page_padding_clamped"
            );
        }
        self.effective_page = PageGeometry {
            width,
            height,
            padding,
            spacing,
            min_paragraph_height,
        };
        self.effective_page
    }

    /// Re-apply `ctx`. Returns `Some(geometry)` when the effective geometry
    /// changed, else `None`.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<PageGeometry> {
        let prev = self.effective_page;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }

    pub fn page_geometry(&self) -> PageGeometry {
        self.effective_page
    }

    pub fn caret_settings(&self) -> CaretSettings {
        let defaults = CaretSettings::default();
        let caret = &self.file.caret;
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        CaretSettings {
            blink_interval: Duration::from_millis(caret.blink_ms),
            line_height_factor: positive(caret.line_height_factor, defaults.line_height_factor),
            fallback_line_height: positive(
                caret.fallback_line_height,
                defaults.fallback_line_height,
            ),
        }
    }

    /// Initial text style. Values that fail to parse keep the default and
    /// log a warning.
    pub fn default_style(&self) -> Style {
        let section = &self.file.style;
        let mut style = Style::default();
        if !section.font_family.trim().is_empty() {
            style.font_family = section.font_family.trim().to_string();
        }
        if section.font_size.is_finite() && section.font_size > 0.0 {
            style.set_font_size(section.font_size);
        }
        match Color::parse(&section.foreground) {
            Ok(color) => style.foreground = color,
            Err(e) => warn!(target: "config", error = %e, "style_foreground_invalid"),
        }
        if let Some(value) = &section.background {
            match Color::parse_background(value) {
                Ok(color) => style.background = color,
                Err(e) => warn!(target: "config", error = %e, "style_background_invalid"),
            }
        }
        style
    }

    pub fn page_marker(&self) -> &str {
        &self.file.text.page_marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
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

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_folio__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.page_geometry(), PageGeometry::default());
        assert_eq!(cfg.page_geometry().content_height(), 864.0);
        assert_eq!(cfg.caret_settings(), CaretSettings::default());
        assert_eq!(cfg.default_style(), Style::default());
        assert_eq!(cfg.page_marker(), DEFAULT_PAGE_MARKER);
    }

    #[test]
    fn parses_sections_and_keeps_defaults_for_missing_fields() {
        let tmp = write_config(
            "[page]\nheight = 800\n\
             [style]\nfont_family = \"Georgia\"\nfont_size = 18\nforeground = \"#ff0000\"\nbackground = \"Transparent\"\n\
             [caret]\nblink_ms = 0\n\
             [text]\npage_marker = \"\\f\"\n",
        );
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let g = cfg.apply_context(ConfigContext::default());
        assert_eq!(g.height, 800.0);
        assert_eq!(g.width, 816.0);
        assert_eq!(g.content_height(), 608.0);

        let style = cfg.default_style();
        assert_eq!(style.font_family, "Georgia");
        assert_eq!(style.font_size, 18.0);
        assert_eq!(style.foreground, Color::rgb(255, 0, 0));
        assert_eq!(style.background, None);

        assert!(cfg.caret_settings().blink_interval.is_zero());
        assert_eq!(cfg.caret_settings().line_height_factor, 1.2);
        assert_eq!(cfg.page_marker(), "\u{c}");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let tmp = write_config("[page]\nwidth = 600\nruler = true\n[plugins]\nx = 1\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.page.width, 600.0);
    }

    #[test]
    fn parse_error_falls_back_to_defaults() {
        let tmp = write_config("[page\nwidth = ");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.file, ConfigFile::default());
    }

    #[test]
    fn invalid_style_values_keep_defaults() {
        let tmp = write_config("[style]\nforeground = \"#zz\"\nfont_size = -2\nfont_family = \"  \"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.default_style(), Style::default());
    }

    #[test]
    fn padding_clamped_when_no_content_area_remains() {
        let tmp = write_config("[page]\nwidth = 300\nheight = 400\npadding = 500\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let g = cfg.apply_context(ConfigContext::new(100.0, 20.0));
        // width bound: (300 - 100) / 2 = 100 is tighter than (400 - 20) / 2
        assert_eq!(g.padding, 100.0);
        assert_eq!(g.content_width(), 100.0);
        assert_eq!(cfg.file.page.padding, 500.0);
    }

    #[test]
    fn recompute_with_context_reports_changes() {
        let tmp = write_config("[page]\nwidth = 300\nheight = 400\npadding = 100\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.apply_context(ConfigContext::default()).padding, 100.0);
        let changed = cfg.recompute_with_context(ConfigContext::new(200.0, 20.0));
        assert_eq!(changed.map(|g| g.padding), Some(50.0));
        assert_eq!(cfg.recompute_with_context(ConfigContext::new(200.0, 20.0)), None);
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let tmp = write_config("[page]\nheight = 100\npadding = 96\n");
        let mut cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        with_default(subscriber, || {
            cfg.apply_context(ConfigContext::default());
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("page_padding_clamped"));
        // (100 - 20) / 2
        assert_eq!(cfg.effective_page.padding, 40.0);
    }
}
