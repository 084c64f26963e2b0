//! Character formatting attributes carried by every run.
//!
//! `Style` is a plain value type: equality is structural (`PartialEq`), while
//! `same_format` is the looser comparison used when deciding whether typed
//! text may extend the previous run (font size compared within
//! `FONT_SIZE_EPSILON`).

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Tolerance applied to font sizes by `Style::same_format`.
pub const FONT_SIZE_EPSILON: f64 = 1e-2;

/// Default family used when no configuration overrides it.
pub const DEFAULT_FONT_FAMILY: &str = "Calibri";

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 14.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Weight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Slant {
    #[default]
    Normal,
    Italic,
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Alignment {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "center" | "centre" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            _ => Err(StyleParseError::Unknown(s.to_string())),
        }
    }
}

/// Straight (non-premultiplied) RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleParseError {
    #[error("empty style value")]
    Empty,
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
    #[error("unknown value `{0}`")]
    Unknown(String),
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse `#RGB`, `#RRGGBB`, `#AARRGGBB` or a named color.
    pub fn parse(value: &str) -> Result<Self, StyleParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(StyleParseError::Empty);
        }
        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex).ok_or_else(|| StyleParseError::InvalidHex(value.into()));
        }
        Self::named(value).ok_or_else(|| StyleParseError::Unknown(value.into()))
    }

    /// Parse a background color where `Transparent` means "none".
    pub fn parse_background(value: &str) -> Result<Option<Self>, StyleParseError> {
        let color = Self::parse(value)?;
        Ok((!color.is_transparent()).then_some(color))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(
                nibble(0)? * 17,
                nibble(1)? * 17,
                nibble(2)? * 17,
            )),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "transparent" => Self::rgba(255, 255, 255, 0),
            _ => return None,
        };
        Some(color)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

impl FromStr for Color {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Full attribute set of a run (and of the pending typing style).
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub weight: Weight,
    pub slant: Slant,
    pub underline: bool,
    pub strikethrough: bool,
    pub foreground: Color,
    pub background: Option<Color>,
    pub font_family: String,
    /// Always positive; setters clamp.
    pub font_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            weight: Weight::Normal,
            slant: Slant::Normal,
            underline: false,
            strikethrough: false,
            foreground: Color::BLACK,
            background: None,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Style {
    pub fn is_bold(&self) -> bool {
        self.weight == Weight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.slant == Slant::Italic
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.weight = if bold { Weight::Bold } else { Weight::Normal };
    }

    pub fn set_italic(&mut self, italic: bool) {
        self.slant = if italic { Slant::Italic } else { Slant::Normal };
    }

    /// Set the font size, ignoring non-finite or non-positive values.
    pub fn set_font_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.font_size = size;
        }
    }

    /// Format comparison used by the typing merge optimization.
    pub fn same_format(&self, other: &Style) -> bool {
        self.weight == other.weight
            && self.slant == other.slant
            && self.underline == other.underline
            && self.strikethrough == other.strikethrough
            && self.foreground == other.foreground
            && self.background == other.background
            && self.font_family == other.font_family
            && (self.font_size - other.font_size).abs() < FONT_SIZE_EPSILON
    }
}
