//! Color values used by strokes, text elements and backgrounds.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color: {0:?}")]
pub struct ColorParseError(pub String);

/// An sRGB color with 8-bit channels.
///
/// Serialized as a CSS-style hex string (`#rrggbb`, or `#rrggbbaa` when the
/// color is not fully opaque) so board exports stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl BoardColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Scale the alpha channel by `opacity` (clamped to 0..=1).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..self }
    }

    /// Hex representation, without alpha when fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for BoardColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for BoardColor {
    type Err = ColorParseError;

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ColorParseError(s.to_string()))
        };

        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(0..1)? * 17;
                let g = channel(1..2)? * 17;
                let b = channel(2..3)? * 17;
                Ok(Self::rgb(r, g, b))
            }
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(ColorParseError(s.to_string())),
        }
    }
}

impl fmt::Display for BoardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for BoardColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BoardColor> for String {
    fn from(color: BoardColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for BoardColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<BoardColor> for Color {
    fn from(color: BoardColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_hex() {
        let color: BoardColor = "#FF0000".parse().unwrap();
        assert_eq!(color, BoardColor::rgb(255, 0, 0));
    }

    #[test]
    fn test_parse_short_hex() {
        let color: BoardColor = "#0f8".parse().unwrap();
        assert_eq!(color, BoardColor::rgb(0, 255, 136));
    }

    #[test]
    fn test_parse_with_alpha() {
        let color: BoardColor = "#11223380".parse().unwrap();
        assert_eq!(color, BoardColor::new(0x11, 0x22, 0x33, 0x80));
        assert_eq!(color.to_hex(), "#11223380");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("red".parse::<BoardColor>().is_err());
        assert!("#12345".parse::<BoardColor>().is_err());
        assert!("#ééé".parse::<BoardColor>().is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&BoardColor::rgb(0x3b, 0x82, 0xf6)).unwrap();
        assert_eq!(json, "\"#3b82f6\"");
        let back: BoardColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BoardColor::rgb(0x3b, 0x82, 0xf6));
    }

    #[test]
    fn test_with_opacity() {
        let color = BoardColor::rgb(10, 20, 30).with_opacity(0.3);
        assert_eq!(color.a, 77);
        assert_eq!(BoardColor::BLACK.with_opacity(2.0).a, 255);
    }

    #[test]
    fn test_peniko_conversion() {
        let color = BoardColor::new(1, 2, 3, 200);
        let peniko: Color = color.into();
        assert_eq!(BoardColor::from(peniko), color);
    }
}
