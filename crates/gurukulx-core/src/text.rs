//! Positioned, editable text boxes.

use crate::color::BoardColor;
use crate::region::RegionId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for text elements.
pub type TextId = Uuid;

/// Typography of a text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    pub color: BoardColor,
    pub font_family: String,
    #[serde(default)]
    pub is_bold: bool,
    #[serde(default)]
    pub is_italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            color: BoardColor::BLACK,
            font_family: "Inter".to_string(),
            is_bold: false,
            is_italic: false,
        }
    }
}

/// A text box on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: TextId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    #[serde(flatten)]
    pub style: TextStyle,
    pub region: RegionId,
}

impl TextElement {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Partial update of a text element. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<BoardColor>,
    pub is_bold: Option<bool>,
    pub is_italic: Option<bool>,
}

impl TextPatch {
    /// Whether the patch changes the element's position.
    pub fn moves(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Size rules for text boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLimits {
    pub default_width: f64,
    pub default_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            default_width: 200.0,
            default_height: 30.0,
            min_width: 100.0,
            min_height: 30.0,
            min_font_size: 8.0,
            max_font_size: 72.0,
        }
    }
}

impl TextLimits {
    pub fn clamp_width(&self, width: f64) -> f64 {
        width.max(self.min_width)
    }

    pub fn clamp_height(&self, height: f64) -> f64 {
        height.max(self.min_height)
    }

    pub fn clamp_font_size(&self, size: f64) -> f64 {
        size.clamp(self.min_font_size, self.max_font_size)
    }
}

/// All text elements on the board, in creation order.
#[derive(Debug, Clone, Default)]
pub struct TextStore {
    elements: Vec<TextElement>,
    limits: TextLimits,
}

impl TextStore {
    pub fn new(limits: TextLimits) -> Self {
        Self {
            elements: Vec::new(),
            limits,
        }
    }

    pub fn limits(&self) -> &TextLimits {
        &self.limits
    }

    /// Create an empty text box at `point` with the default size.
    pub fn create(&mut self, point: Point, region: RegionId, style: TextStyle) -> &TextElement {
        let style = TextStyle {
            font_size: self.limits.clamp_font_size(style.font_size),
            ..style
        };
        let element = TextElement {
            id: Uuid::new_v4(),
            x: point.x,
            y: point.y,
            width: self.limits.default_width,
            height: self.limits.default_height,
            text: String::new(),
            style,
            region,
        };
        log::debug!("text element {} created in {}", element.id, element.region);
        let index = self.elements.len();
        self.elements.push(element);
        &self.elements[index]
    }

    /// Apply a partial update. Returns the updated element, or `None` if the
    /// id is unknown.
    pub fn update(&mut self, id: TextId, patch: TextPatch) -> Option<&TextElement> {
        let limits = self.limits;
        let element = self.elements.iter_mut().find(|e| e.id == id)?;

        if let Some(x) = patch.x {
            element.x = x;
        }
        if let Some(y) = patch.y {
            element.y = y;
        }
        if let Some(width) = patch.width {
            element.width = limits.clamp_width(width);
        }
        if let Some(height) = patch.height {
            element.height = limits.clamp_height(height);
        }
        if let Some(text) = patch.text {
            element.text = text;
        }
        if let Some(size) = patch.font_size {
            element.style.font_size = limits.clamp_font_size(size);
        }
        if let Some(color) = patch.color {
            element.style.color = color;
        }
        if let Some(bold) = patch.is_bold {
            element.style.is_bold = bold;
        }
        if let Some(italic) = patch.is_italic {
            element.style.is_italic = italic;
        }

        Some(&*element)
    }

    /// Change the region tag of an element.
    pub fn set_region(&mut self, id: TextId, region: RegionId) {
        if let Some(element) = self.elements.iter_mut().find(|e| e.id == id) {
            element.region = region;
        }
    }

    /// Remove an element. Unknown ids are ignored.
    pub fn delete(&mut self, id: TextId) -> Option<TextElement> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    pub fn get(&self, id: TextId) -> Option<&TextElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn list(&self) -> &[TextElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn count_in_region(&self, region: &str) -> usize {
        self.elements.iter().filter(|e| e.region == region).count()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}
