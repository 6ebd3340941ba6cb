// Sparkline visual configuration
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must start with '#': {0}")]
    MissingHash(String),
    #[error("color must have 3 or 6 hex digits: {0}")]
    BadLength(String),
    #[error("invalid hex digit in color: {0}")]
    BadDigit(String),
}

/// An opaque RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(s.to_string()))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigit(s.to_string()));
        }

        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|_| ColorError::BadDigit(s.to_string()))
        };

        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            // "#abc" is shorthand for "#aabbcc"
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 0x11);
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(ColorError::BadLength(s.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Inset between the canvas edge and the drawn line, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margin {
    pub const UNIFORM: Margin = Margin {
        left: 1.0,
        top: 1.0,
        right: 1.0,
        bottom: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparklineConfig {
    pub width: f64,
    pub height: f64,
    pub background_color: Color,
    pub line_color: Color,
}

impl SparklineConfig {
    pub fn new(width: f64, height: f64, background_color: Color, line_color: Color) -> Self {
        Self {
            width,
            height,
            background_color,
            line_color,
        }
    }

    pub fn margin(&self) -> Margin {
        Margin::UNIFORM
    }
}

impl Default for SparklineConfig {
    /// Node map QPS sparkline dimensions.
    fn default() -> Self {
        Self::new(
            69.0,
            10.0,
            Color::rgb(0xB8, 0xCC, 0xEC),
            Color::rgb(0x3A, 0x7D, 0xE1),
        )
    }
}
