//! RGBA colors and CSS color string parsing
//!
//! Input files describe fill colors the way a web page would: hex notation
//! (`#f00`, `#ff0000`, `#ff000080`), functional notation (`rgb(255, 0, 0)`,
//! `rgba(255, 0, 0, 0.5)`) or a named color (`red`, `steelblue`).

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

/// An RGBA color with each component in 0.0-1.0
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Used for fill colors that could not be parsed
    pub const FALLBACK: Self = Self::rgb(0.5, 0.5, 0.5);

    /// Create a new color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create an opaque color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Create a color from 8-bit channels
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Components as an array (for GPU upload)
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse a CSS color string
    ///
    /// Surrounding whitespace is ignored and matching is case-insensitive.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ColorParseError::Empty);
        }
        let lower = trimmed.to_ascii_lowercase();

        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::Invalid(trimmed.to_string()));
        }
        if let Some(args) = functional_args(&lower, "rgba").or_else(|| functional_args(&lower, "rgb")) {
            return parse_rgb_args(args).ok_or_else(|| ColorParseError::Invalid(trimmed.to_string()));
        }
        named(&lower).ok_or_else(|| ColorParseError::Unknown(trimmed.to_string()))
    }

    /// Parse a CSS color string, falling back to [`Color::FALLBACK`]
    pub fn parse_or_fallback(input: &str) -> Self {
        Self::parse(input).unwrap_or(Self::FALLBACK)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error returned when a color string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string was empty or only whitespace
    Empty,
    /// Hex or functional notation with malformed digits
    Invalid(String),
    /// Not a known color name
    Unknown(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::Empty => write!(f, "empty color string"),
            ColorParseError::Invalid(s) => write!(f, "malformed color: {}", s),
            ColorParseError::Unknown(s) => write!(f, "unknown color name: {}", s),
        }
    }
}

impl std::error::Error for ColorParseError {}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color::from_rgb8(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color::from_rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// Return the text between the parentheses of `name(...)`
fn functional_args<'a>(input: &'a str, name: &str) -> Option<&'a str> {
    input
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| -> Option<f32> {
        let value = match s.strip_suffix('%') {
            Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
            None => s.parse::<f32>().ok()? / 255.0,
        };
        value.is_finite().then(|| value.clamp(0.0, 1.0))
    };

    let alpha = match parts.get(3) {
        Some(s) => {
            let a = match s.strip_suffix('%') {
                Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
                None => s.parse::<f32>().ok()?,
            };
            if !a.is_finite() {
                return None;
            }
            a.clamp(0.0, 1.0)
        }
        None => 1.0,
    };

    Some(Color::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha))
}

fn named(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "lime" => (0, 255, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "purple" => (128, 0, 128),
        "teal" => (0, 128, 128),
        "orange" => (255, 165, 0),
        "pink" => (255, 192, 203),
        "hotpink" => (255, 105, 180),
        "brown" => (165, 42, 42),
        "gold" => (255, 215, 0),
        "coral" => (255, 127, 80),
        "salmon" => (250, 128, 114),
        "tomato" => (255, 99, 71),
        "crimson" => (220, 20, 60),
        "indigo" => (75, 0, 130),
        "violet" => (238, 130, 238),
        "orchid" => (218, 112, 214),
        "turquoise" => (64, 224, 208),
        "skyblue" => (135, 206, 235),
        "steelblue" => (70, 130, 180),
        "royalblue" => (65, 105, 225),
        "dodgerblue" => (30, 144, 255),
        "darkblue" => (0, 0, 139),
        "darkgreen" => (0, 100, 0),
        "darkred" => (139, 0, 0),
        "forestgreen" => (34, 139, 34),
        "seagreen" => (46, 139, 87),
        "limegreen" => (50, 205, 50),
        "khaki" => (240, 230, 140),
        "beige" => (245, 245, 220),
        "chocolate" => (210, 105, 30),
        "tan" => (210, 180, 140),
        "plum" => (221, 160, 221),
        "lavender" => (230, 230, 250),
        "transparent" => return Some(Color::new(0.0, 0.0, 0.0, 0.0)),
        _ => return None,
    };
    Some(Color::from_rgb8(r, g, b))
}
