//! Named board regions and point classification.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Identifier of a region.
pub type RegionId = String;

/// Region returned when no configured region contains a point.
pub const DEFAULT_REGION: &str = "main";

/// A named rectangular area of the board.
///
/// Geometry is in percent (0-100) of the surface's logical size, so regions
/// survive resizes unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(id: &str, name: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle in canonical surface coordinates.
    pub fn surface_rect(&self, surface: Size) -> Rect {
        Rect::new(
            self.x * surface.width / 100.0,
            self.y * surface.height / 100.0,
            (self.x + self.width) * surface.width / 100.0,
            (self.y + self.height) * surface.height / 100.0,
        )
    }

    /// Inclusive containment test for a point in percent space.
    pub fn contains_percent(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// The stock teaching layout: a wide main board with three side panels.
pub fn default_regions() -> Vec<Region> {
    vec![
        Region::new("main", "Main Board", 0.0, 0.0, 70.0, 100.0),
        Region::new("notes", "Notes", 70.0, 0.0, 30.0, 50.0),
        Region::new("formulas", "Formulas", 70.0, 50.0, 30.0, 25.0),
        Region::new("scratch", "Scratch Pad", 70.0, 75.0, 30.0, 25.0),
    ]
}

/// Classify a canonical point into a region.
///
/// The first region in declaration order that contains the point wins, so
/// overlapping layouts resolve deterministically. Falls back to
/// [`DEFAULT_REGION`].
pub fn classify<'a>(point: Point, surface: Size, regions: &'a [Region]) -> &'a str {
    let width = if surface.width > 0.0 { surface.width } else { 1.0 };
    let height = if surface.height > 0.0 { surface.height } else { 1.0 };
    let percent = Point::new(point.x * 100.0 / width, point.y * 100.0 / height);

    regions
        .iter()
        .find(|r| r.contains_percent(percent))
        .map(|r| r.id.as_str())
        .unwrap_or(DEFAULT_REGION)
}
