//! Camera module for pan/zoom of the board view.

use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Multiplier applied by one zoom step.
pub const ZOOM_STEP: f64 = 1.2;

/// Camera manages the view transform of the board.
///
/// Pan and zoom only change where the surface is displayed. Stroke geometry
/// stays in canonical coordinates; the coordinate mapper undoes the view
/// through the rendered box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
    /// Factor used by `zoom_in`/`zoom_out`
    pub step: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
            step: ZOOM_STEP,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera with custom zoom bounds and step.
    pub fn with_limits(min_zoom: f64, max_zoom: f64, step: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            step,
            ..Self::default()
        }
    }

    /// Where a surface laid out at `base` ends up on screen.
    pub fn display_box(&self, base: Rect) -> Rect {
        Rect::from_origin_size(
            base.origin() + self.offset,
            (base.width() * self.zoom, base.height() * self.zoom),
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * self.step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / self.step);
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
