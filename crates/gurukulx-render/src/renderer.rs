//! Renderer trait abstraction.

use gurukulx_core::shape::Shape;
use gurukulx_core::stroke::Stroke;
use gurukulx_core::text::TextElement;
use gurukulx_core::{Background, WhiteboardState};
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("Export failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything needed to draw one frame of the board.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    /// Committed strokes in z-order.
    pub strokes: &'a [Stroke],
    /// Committed shapes in z-order, drawn above strokes.
    pub shapes: &'a [Shape],
    /// Text boxes, drawn above all strokes.
    pub texts: &'a [TextElement],
    /// Logical surface size in canonical pixels.
    pub surface_size: Size,
    /// Output pixels per canonical pixel.
    pub scale_factor: f64,
    pub background: Background,
    pub include_text: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with no shapes or text boxes.
    pub fn new(strokes: &'a [Stroke], surface_size: Size) -> Self {
        Self {
            strokes,
            shapes: &[],
            texts: &[],
            surface_size,
            scale_factor: 1.0,
            background: Background::White,
            include_text: true,
        }
    }

    /// Context for the committed content of a board. A stroke in progress
    /// is never part of it.
    pub fn from_board(board: &'a WhiteboardState) -> Self {
        Self {
            strokes: board.strokes(),
            shapes: board.shapes(),
            texts: board.texts(),
            surface_size: board.surface().logical,
            scale_factor: 1.0,
            background: board.background(),
            include_text: true,
        }
    }

    /// Set the scale factor for HiDPI output.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_shapes(mut self, shapes: &'a [Shape]) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn with_texts(mut self, texts: &'a [TextElement]) -> Self {
        self.texts = texts;
        self
    }

    /// Toggle text box rendering.
    pub fn with_text(mut self, include_text: bool) -> Self {
        self.include_text = include_text;
        self
    }

    /// Output size in whole pixels.
    pub fn output_size(&self) -> (u32, u32) {
        let scale = if self.scale_factor > 0.0 { self.scale_factor } else { 1.0 };
        (
            (self.surface_size.width * scale).ceil().max(0.0) as u32,
            (self.surface_size.height * scale).ceil().max(0.0) as u32,
        )
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Draw the frame described by `ctx`.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background.base_color().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurukulx_core::BoardColor;

    #[test]
    fn test_output_size_scales() {
        let ctx = RenderContext::new(&[], Size::new(100.0, 50.5)).with_scale_factor(2.0);
        assert_eq!(ctx.output_size(), (200, 101));
    }

    #[test]
    fn test_background_color_from_mode() {
        struct Noop;
        impl Renderer for Noop {
            fn build_scene(&mut self, _ctx: &RenderContext) -> RenderResult<()> {
                Ok(())
            }
        }

        let solid = BoardColor::rgb(0xfe, 0xf3, 0xc7);
        let ctx = RenderContext::new(&[], Size::new(10.0, 10.0))
            .with_background(Background::Solid(solid));
        assert_eq!(BoardColor::from(Noop.background_color(&ctx)), solid);

        let grid = ctx.with_background(Background::Grid);
        assert_eq!(BoardColor::from(Noop.background_color(&grid)), BoardColor::WHITE);
    }
}
