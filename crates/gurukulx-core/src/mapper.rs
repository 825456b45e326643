//! Pointer-to-surface coordinate mapping.
//!
//! Pointer events arrive in client (screen) space. The drawing surface is
//! rendered into a box whose CSS size can differ from its logical pixel size
//! (device pixel ratio, zoom), so every event is mapped fresh against the
//! current box. The box is never cached across events.

use crate::stroke::SamplePoint;
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};

/// Pressure used when the device reports none.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// A pointer event in client space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    /// Reported pressure (0..1). Mice usually report nothing or 0.
    #[serde(default)]
    pub pressure: Option<f64>,
    /// Event time in milliseconds.
    #[serde(default)]
    pub timestamp: u64,
}

impl PointerEvent {
    pub fn new(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            pressure: None,
            timestamp: 0,
        }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Reported pressure, or [`DEFAULT_PRESSURE`] when missing or zero.
    pub fn effective_pressure(&self) -> f64 {
        match self.pressure {
            Some(p) if p > 0.0 => p.min(1.0),
            _ => DEFAULT_PRESSURE,
        }
    }
}

/// The drawing surface as seen by the mapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// Box the surface element currently occupies in client space.
    /// `None` until the surface is mounted.
    pub rendered: Option<Rect>,
    /// Logical pixel dimensions of the drawing buffer.
    pub logical: Size,
}

impl Surface {
    /// Create an unmounted surface with the given logical size.
    pub fn new(logical: Size) -> Self {
        Self {
            rendered: None,
            logical,
        }
    }

    /// Record where the surface element is rendered.
    pub fn mount(&mut self, rendered: Rect) {
        self.rendered = Some(rendered);
    }

    pub fn unmount(&mut self) {
        self.rendered = None;
    }

    /// A surface counts as mounted once it has a box with a non-zero area.
    pub fn is_mounted(&self) -> bool {
        self.rendered
            .is_some_and(|r| r.width() > 0.0 && r.height() > 0.0)
    }
}

/// Map a pointer event to canonical surface coordinates.
///
/// `canonical.x = (clientX - box.left) / box.width * logical.width`, and the
/// same for y. Returns the origin when the surface is not mounted; callers
/// must not start drawing in that state.
pub fn map_to_canonical(event: &PointerEvent, surface: &Surface) -> SamplePoint {
    let (x, y) = match surface.rendered {
        Some(rect) if rect.width() > 0.0 && rect.height() > 0.0 => (
            (event.client_x - rect.x0) / rect.width() * surface.logical.width,
            (event.client_y - rect.y0) / rect.height() * surface.logical.height,
        ),
        _ => (0.0, 0.0),
    };

    SamplePoint {
        x,
        y,
        pressure: event.effective_pressure(),
        timestamp: event.timestamp,
    }
}
