//! Freehand stroke records.

use crate::color::BoardColor;
use crate::mapper::DEFAULT_PRESSURE;
use crate::region::RegionId;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for strokes.
pub type StrokeId = Uuid;

fn default_pressure() -> f64 {
    DEFAULT_PRESSURE
}

/// A sampled pointer position in canonical surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    /// Pen pressure (0..1).
    #[serde(default = "default_pressure")]
    pub pressure: f64,
    /// Sample time in milliseconds.
    #[serde(default)]
    pub timestamp: u64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            pressure: DEFAULT_PRESSURE,
            timestamp: 0,
        }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = pressure.clamp(0.0, 1.0);
        self
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Position as a kurbo point.
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Tool a stroke was drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrokeTool {
    #[default]
    Pen,
    /// Wide translucent ink, drawn beneath pen strokes.
    Highlighter,
    /// Paints erasure: removes ink underneath it when rendered.
    EraserMarker,
}

impl StrokeTool {
    pub fn name(&self) -> &'static str {
        match self {
            StrokeTool::Pen => "pen",
            StrokeTool::Highlighter => "highlighter",
            StrokeTool::EraserMarker => "eraser-marker",
        }
    }
}

/// Visual properties captured when a stroke begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: BoardColor,
    /// Line width in canonical pixels.
    pub size: f64,
    /// Overall opacity (0.0 = invisible, 1.0 = opaque).
    pub opacity: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: BoardColor::BLACK,
            size: 3.0,
            opacity: 1.0,
        }
    }
}

/// A freehand stroke: one continuous drawing action from pointer-down to
/// pointer-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: StrokeId,
    pub points: Vec<SamplePoint>,
    pub tool: StrokeTool,
    #[serde(flatten)]
    pub style: StrokeStyle,
    pub region: Option<RegionId>,
}

impl Stroke {
    /// Create a stroke with no points yet.
    pub fn new(tool: StrokeTool, style: StrokeStyle, region: Option<RegionId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            tool,
            style,
            region,
        }
    }

    /// Append a sample. Only the stroke store calls this, and only while the
    /// stroke is in progress.
    pub(crate) fn push(&mut self, point: SamplePoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the sampled points (ignores line width).
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Whether any sampled point lies within `radius` of `point`.
    pub fn hits(&self, point: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.pos().distance(point) <= radius)
    }

    /// Smoothed outline for rendering.
    ///
    /// Consecutive samples are joined with quadratic curves through their
    /// midpoints: each sample is a control point and the curve passes through
    /// the midpoints between samples. The first and last samples are reached
    /// with straight segments. A single-sample stroke yields only a move-to;
    /// renderers draw it as a dot.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.points.first() else {
            return path;
        };

        path.move_to(first.pos());
        for (i, pair) in self.points.windows(2).enumerate() {
            let prev = pair[0].pos();
            let mid = prev.midpoint(pair[1].pos());
            if i == 0 {
                path.line_to(mid);
            } else {
                path.quad_to(prev, mid);
            }
        }

        if self.points.len() > 1 {
            if let Some(last) = self.points.last() {
                path.line_to(last.pos());
            }
        }

        path
    }
}
