//! Geometric shapes drawn by dragging a shape tool.
//!
//! A shape is defined by the drag's start and end points. Closed shapes are
//! inscribed in the box spanned by the two points; lines and arrows run from
//! start to end.

use crate::color::BoardColor;
use crate::region::RegionId;
use kurbo::{BezPath, Circle, Point, Rect, Shape as _, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, TAU};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Length of an arrowhead side in canonical pixels.
pub const ARROW_HEAD_SIZE: f64 = 15.0;

/// Drags spanning less than this on both axes draw nothing.
pub const MIN_SHAPE_EXTENT: f64 = 1.0;

/// Inner radius of a star relative to its outer radius.
const STAR_INNER_RATIO: f64 = 0.4;

const PATH_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
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

impl ShapeKind {
    pub const ALL: [ShapeKind; 10] = [
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Triangle,
        ShapeKind::Line,
        ShapeKind::Arrow,
        ShapeKind::Diamond,
        ShapeKind::Hexagon,
        ShapeKind::Pentagon,
        ShapeKind::Star,
        ShapeKind::Heart,
    ];

    /// Closed outlines can carry a fill; lines and arrows cannot.
    pub fn is_closed(&self) -> bool {
        !matches!(self, ShapeKind::Line | ShapeKind::Arrow)
    }
}

/// Outline and fill of a shape, captured when the drag begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub color: BoardColor,
    /// Outline width in canonical pixels.
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<BoardColor>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: BoardColor::BLACK,
            stroke_width: 3.0,
            fill: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    /// Where the drag started.
    pub start: Point,
    /// Where the drag ended.
    pub end: Point,
    #[serde(flatten)]
    pub style: ShapeStyle,
    /// Region of the start point.
    pub region: RegionId,
}

impl Shape {
    pub fn new(kind: ShapeKind, start: Point, end: Point, style: ShapeStyle, region: RegionId) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            start,
            end,
            style,
            region,
        }
    }

    /// Box spanned by the drag.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    /// True when the drag was too short to draw anything.
    pub fn is_degenerate(&self) -> bool {
        let bounds = self.bounds();
        bounds.width() < MIN_SHAPE_EXTENT && bounds.height() < MIN_SHAPE_EXTENT
    }

    /// Fill color, if the shape is closed and has one.
    pub fn fill(&self) -> Option<BoardColor> {
        self.style.fill.filter(|_| self.kind.is_closed())
    }

    /// Unit vector from start to end. Falls back to +x for a zero-length drag.
    pub fn direction(&self) -> Vec2 {
        let delta = self.end - self.start;
        let len = delta.hypot();
        if len < f64::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            delta / len
        }
    }

    /// Outline as a path in canonical coordinates.
    pub fn to_path(&self) -> BezPath {
        let r = self.bounds();
        match self.kind {
            ShapeKind::Rectangle => r.to_path(PATH_TOLERANCE),
            ShapeKind::Circle => {
                Circle::new(r.center(), r.width().min(r.height()) / 2.0).to_path(PATH_TOLERANCE)
            }
            ShapeKind::Triangle => polygon(&[
                Point::new(r.center().x, r.y0),
                Point::new(r.x0, r.y1),
                Point::new(r.x1, r.y1),
            ]),
            ShapeKind::Diamond => {
                let c = r.center();
                polygon(&[
                    Point::new(c.x, r.y0),
                    Point::new(r.x1, c.y),
                    Point::new(c.x, r.y1),
                    Point::new(r.x0, c.y),
                ])
            }
            ShapeKind::Hexagon => polygon(&regular_vertices(r, 6, 1.0, 0.0)),
            ShapeKind::Pentagon => polygon(&regular_vertices(r, 5, 1.0, 0.0)),
            ShapeKind::Star => {
                let outer = regular_vertices(r, 5, 1.0, 0.0);
                let inner = regular_vertices(r, 5, STAR_INNER_RATIO, TAU / 10.0);
                let points: Vec<Point> = outer
                    .into_iter()
                    .zip(inner)
                    .flat_map(|(o, i)| [o, i])
                    .collect();
                polygon(&points)
            }
            ShapeKind::Heart => heart(r),
            ShapeKind::Line => {
                let mut path = BezPath::new();
                path.move_to(self.start);
                path.line_to(self.end);
                path
            }
            ShapeKind::Arrow => {
                let mut path = BezPath::new();
                path.move_to(self.start);
                path.line_to(self.end);
                let angle = self.direction().atan2();
                let left = self.end - Vec2::from_angle(angle - FRAC_PI_6) * ARROW_HEAD_SIZE;
                let right = self.end - Vec2::from_angle(angle + FRAC_PI_6) * ARROW_HEAD_SIZE;
                path.move_to(left);
                path.line_to(self.end);
                path.line_to(right);
                path
            }
        }
    }
}

fn polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    path.close_path();
    path
}

/// Vertices of a regular `n`-gon inscribed in the ellipse of `r`, scaled by
/// `scale`. The first vertex sits at the top, turned clockwise by `phase`.
fn regular_vertices(r: Rect, n: usize, scale: f64, phase: f64) -> Vec<Point> {
    let c = r.center();
    let rx = r.width() / 2.0 * scale;
    let ry = r.height() / 2.0 * scale;
    (0..n)
        .map(|i| {
            let angle = -FRAC_PI_2 + phase + TAU * i as f64 / n as f64;
            Point::new(c.x + rx * angle.cos(), c.y + ry * angle.sin())
        })
        .collect()
}

fn heart(r: Rect) -> BezPath {
    let (w, h) = (r.width(), r.height());
    let at = |fx: f64, fy: f64| Point::new(r.x0 + w * fx, r.y0 + h * fy);
    let mut path = BezPath::new();
    path.move_to(at(0.5, 0.3));
    path.curve_to(at(0.5, 0.0), at(0.0, 0.0), at(0.0, 0.3));
    path.curve_to(at(0.0, 0.6), at(0.5, 0.8), at(0.5, 1.0));
    path.curve_to(at(0.5, 0.8), at(1.0, 0.6), at(1.0, 0.3));
    path.curve_to(at(1.0, 0.0), at(0.5, 0.0), at(0.5, 0.3));
    path.close_path();
    path
}

/// Committed shapes in z-order (back to front).
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a shape on top. Degenerate shapes are dropped.
    pub fn add(&mut self, shape: Shape) -> Option<&Shape> {
        if shape.is_degenerate() {
            log::debug!("discarding degenerate {:?} {}", shape.kind, shape.id);
            return None;
        }
        self.shapes.push(shape);
        self.shapes.last()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn delete(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        Some(self.shapes.remove(index))
    }

    pub fn list(&self) -> &[Shape] {
        &self.shapes
    }

    /// Replace every shape (used by undo/redo).
    pub fn replace(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
