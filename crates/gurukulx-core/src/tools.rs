//! Tool selection and drawing settings.

use crate::color::BoardColor;
use crate::shape::{ShapeKind, ShapeStyle};
use crate::stroke::{StrokeStyle, StrokeTool};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    #[default]
    Pen,
    Highlighter,
    EraserMarker,
    /// Removes whole strokes near the pointer.
    Eraser,
    /// Places a text box.
    Text,
    Rectangle,
    Circle,
    Triangle,
    Line,
    Arrow,
    Diamond,
    Hexagon,
    Pentagon,
    Star,
    Heart,
}

impl ToolKind {
    /// Stroke tool this tool draws with, if it draws at all.
    pub fn stroke_tool(&self) -> Option<StrokeTool> {
        match self {
            ToolKind::Pen => Some(StrokeTool::Pen),
            ToolKind::Highlighter => Some(StrokeTool::Highlighter),
            ToolKind::EraserMarker => Some(StrokeTool::EraserMarker),
            _ => None,
        }
    }

    /// Shape this tool drags out, if it is a shape tool.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Triangle => Some(ShapeKind::Triangle),
            ToolKind::Line => Some(ShapeKind::Line),
            ToolKind::Arrow => Some(ShapeKind::Arrow),
            ToolKind::Diamond => Some(ShapeKind::Diamond),
            ToolKind::Hexagon => Some(ShapeKind::Hexagon),
            ToolKind::Pentagon => Some(ShapeKind::Pentagon),
            ToolKind::Star => Some(ShapeKind::Star),
            ToolKind::Heart => Some(ShapeKind::Heart),
            _ => None,
        }
    }
}

/// Current tool and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub color: BoardColor,
    pub size: f64,
    pub opacity: f64,
    /// Fill for closed shapes. Outline only when unset.
    #[serde(default)]
    pub fill: Option<BoardColor>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::Pen,
            color: BoardColor::BLACK,
            size: 3.0,
            opacity: 1.0,
            fill: None,
        }
    }
}

impl ToolSettings {
    /// Style captured by a new stroke. Highlighter strokes always use
    /// `highlighter_opacity`.
    pub fn stroke_style(&self, highlighter_opacity: f64) -> StrokeStyle {
        let opacity = match self.tool {
            ToolKind::Highlighter => highlighter_opacity,
            _ => self.opacity,
        };
        StrokeStyle {
            color: self.color,
            size: self.size,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Style captured by a new shape. The brush size is the outline width.
    pub fn shape_style(&self) -> ShapeStyle {
        ShapeStyle {
            color: self.color,
            stroke_width: self.size,
            fill: self.fill,
        }
    }

    /// Hit radius of the stroke eraser.
    pub fn eraser_radius(&self, factor: f64) -> f64 {
        self.size * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_tools() {
        assert_eq!(ToolKind::Pen.stroke_tool(), Some(StrokeTool::Pen));
        assert_eq!(ToolKind::EraserMarker.stroke_tool(), Some(StrokeTool::EraserMarker));
        assert_eq!(ToolKind::Eraser.stroke_tool(), None);
        assert_eq!(ToolKind::Text.stroke_tool(), None);
        assert_eq!(ToolKind::Arrow.stroke_tool(), None);
    }

    #[test]
    fn test_shape_tools() {
        assert_eq!(ToolKind::Heart.shape_kind(), Some(ShapeKind::Heart));
        assert_eq!(ToolKind::Line.shape_kind(), Some(ShapeKind::Line));
        assert_eq!(ToolKind::Pen.shape_kind(), None);

        let settings = ToolSettings {
            tool: ToolKind::Rectangle,
            size: 5.0,
            fill: Some(BoardColor::WHITE),
            ..ToolSettings::default()
        };
        let style = settings.shape_style();
        assert_eq!(style.stroke_width, 5.0);
        assert_eq!(style.fill, Some(BoardColor::WHITE));
    }

    #[test]
    fn test_highlighter_opacity_override() {
        let settings = ToolSettings {
            tool: ToolKind::Highlighter,
            opacity: 0.9,
            ..ToolSettings::default()
        };
        assert!((settings.stroke_style(0.3).opacity - 0.3).abs() < f64::EPSILON);

        let pen = ToolSettings {
            opacity: 0.9,
            ..ToolSettings::default()
        };
        assert!((pen.stroke_style(0.3).opacity - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_eraser_radius() {
        let settings = ToolSettings {
            size: 4.0,
            ..ToolSettings::default()
        };
        assert!((settings.eraser_radius(3.0) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tool_serde_names() {
        let json = serde_json::to_string(&ToolKind::EraserMarker).unwrap();
        assert_eq!(json, "\"eraser-marker\"");
    }
}
