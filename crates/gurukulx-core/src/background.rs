//! Board background modes.

use crate::color::BoardColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spacing of the grid background in canonical pixels.
pub const GRID_SPACING: f64 = 20.0;
/// Spacing of the ruled background in canonical pixels.
pub const LINE_SPACING: f64 = 30.0;
/// Color of grid and ruled lines.
pub const RULE_COLOR: BoardColor = BoardColor::rgb(0xe5, 0xe7, 0xeb);

/// What is painted beneath the strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Background {
    #[default]
    White,
    Grid,
    Lines,
    Solid(BoardColor),
}

impl Background {
    /// Name reported to collaborators (`white`, `grid`, `lines`, or a hex
    /// color).
    pub fn mode(&self) -> String {
        match self {
            Background::White => "white".to_string(),
            Background::Grid => "grid".to_string(),
            Background::Lines => "lines".to_string(),
            Background::Solid(color) => color.to_hex(),
        }
    }

    /// Fill color under any rules.
    pub fn base_color(&self) -> BoardColor {
        match self {
            Background::Solid(color) => *color,
            _ => BoardColor::WHITE,
        }
    }

    /// Switch between white and grid; other modes become grid.
    pub fn toggle_grid(self) -> Self {
        match self {
            Background::Grid => Background::White,
            _ => Background::Grid,
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mode())
    }
}

impl FromStr for Background {
    type Err = crate::color::ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(Background::White),
            "grid" => Ok(Background::Grid),
            "lines" => Ok(Background::Lines),
            other => other.parse().map(Background::Solid),
        }
    }
}

impl TryFrom<String> for Background {
    type Error = crate::color::ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Background> for String {
    fn from(background: Background) -> Self {
        background.mode()
    }
}
