//! CPU raster renderer built on tiny-skia.
//!
//! Layers, bottom to top: background, highlighter layer (composited with
//! multiply), ink layer, shapes, text boxes. Highlighter strokes replace pixels
//! inside their own layer, so overlapping highlights do not stack up.
//! Eraser-marker strokes clear both stroke layers beneath them.

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use font8x8::{BASIC_FONTS, UnicodeFonts};
use gurukulx_core::background::{GRID_SPACING, LINE_SPACING, RULE_COLOR};
use gurukulx_core::shape::Shape;
use gurukulx_core::stroke::{Stroke, StrokeTool};
use gurukulx_core::text::TextElement;
use gurukulx_core::{Background, BoardColor};
use kurbo::{BezPath, PathEl};
use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect,
    Transform,
};

/// Padding between a text box border and its glyphs.
const TEXT_PADDING: f32 = 8.0;
const TEXT_BOX_FILL: BoardColor = BoardColor::new(255, 255, 255, 204);
const TEXT_BOX_BORDER: BoardColor = BoardColor::rgb(0xd1, 0xd5, 0xdb);

fn skia_color(color: BoardColor) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn paint(color: BoardColor, blend_mode: BlendMode) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint.blend_mode = blend_mode;
    paint
}

/// Convert a kurbo path into a tiny-skia path.
fn to_skia_path(path: &BezPath) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => builder.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// Renders the board into an RGBA pixmap.
#[derive(Debug, Default)]
pub struct RasterRenderer {
    pixmap: Option<Pixmap>,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last rendered frame.
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Render a frame and encode it as PNG.
    pub fn render_to_png(&mut self, ctx: &RenderContext) -> RenderResult<Vec<u8>> {
        self.build_scene(ctx)?;
        let pixmap = self
            .pixmap
            .as_ref()
            .ok_or_else(|| RendererError::RenderFailed("no frame rendered".into()))?;
        let png = encode_png(&rgba_data(pixmap), pixmap.width(), pixmap.height())?;
        log::info!(
            "rendered {}x{} board to {} PNG bytes",
            pixmap.width(),
            pixmap.height(),
            png.len()
        );
        Ok(png)
    }

    fn draw_background(
        pixmap: &mut Pixmap,
        fill: BoardColor,
        ctx: &RenderContext,
        transform: Transform,
    ) {
        pixmap.fill(skia_color(fill));

        let width = ctx.surface_size.width as f32;
        let height = ctx.surface_size.height as f32;
        let mut builder = PathBuilder::new();
        match ctx.background {
            Background::Grid => {
                let step = GRID_SPACING as f32;
                let mut x = 0.0;
                while x <= width {
                    builder.move_to(x, 0.0);
                    builder.line_to(x, height);
                    x += step;
                }
                let mut y = 0.0;
                while y <= height {
                    builder.move_to(0.0, y);
                    builder.line_to(width, y);
                    y += step;
                }
            }
            Background::Lines => {
                let step = LINE_SPACING as f32;
                let mut y = step;
                while y <= height {
                    builder.move_to(0.0, y);
                    builder.line_to(width, y);
                    y += step;
                }
            }
            Background::White | Background::Solid(_) => return,
        }

        if let Some(rules) = builder.finish() {
            let stroke = tiny_skia::Stroke {
                width: 1.0,
                ..Default::default()
            };
            pixmap.stroke_path(
                &rules,
                &paint(RULE_COLOR, BlendMode::SourceOver),
                &stroke,
                transform,
                None,
            );
        }
    }

    fn draw_stroke(pixmap: &mut Pixmap, stroke: &Stroke, blend_mode: BlendMode, transform: Transform) {
        let color = match stroke.tool {
            // Alpha is irrelevant for erasure; only coverage matters.
            StrokeTool::EraserMarker => BoardColor::BLACK,
            _ => stroke.style.color.with_opacity(stroke.style.opacity),
        };
        let paint = paint(color, blend_mode);
        let width = stroke.style.size as f32;

        let bounds = stroke.bounds();
        if bounds.width() == 0.0 && bounds.height() == 0.0 {
            // Single point (or a pointer that never moved): draw a dot.
            if let Some(dot) = PathBuilder::from_circle(bounds.x0 as f32, bounds.y0 as f32, width / 2.0)
            {
                pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
            }
            return;
        }

        let Some(path) = to_skia_path(&stroke.to_path()) else {
            return;
        };
        let style = tiny_skia::Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &style, transform, None);
    }

    fn draw_shape(pixmap: &mut Pixmap, shape: &Shape, transform: Transform) {
        let Some(path) = to_skia_path(&shape.to_path()) else {
            return;
        };
        if let Some(fill) = shape.fill() {
            pixmap.fill_path(
                &path,
                &paint(fill, BlendMode::SourceOver),
                FillRule::Winding,
                transform,
                None,
            );
        }
        let style = tiny_skia::Stroke {
            width: shape.style.stroke_width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(
            &path,
            &paint(shape.style.color, BlendMode::SourceOver),
            &style,
            transform,
            None,
        );
    }

    fn draw_text(pixmap: &mut Pixmap, element: &TextElement, transform: Transform) {
        let scale = (element.style.font_size / 8.0) as f32;
        let advance = 8.0 * scale;
        let line_height = 10.0 * scale;
        let inner_width = element.width as f32 - 2.0 * TEXT_PADDING;
        let per_line = ((inner_width / advance).floor() as usize).max(1);

        let lines = wrap_lines(&element.text, per_line);
        let content_height = lines.len() as f32 * line_height + 2.0 * TEXT_PADDING;
        let height = (element.height as f32).max(content_height);

        let x0 = element.x as f32;
        let y0 = element.y as f32;
        let Some(frame) = Rect::from_xywh(x0, y0, element.width as f32, height) else {
            return;
        };
        pixmap.fill_rect(
            frame,
            &paint(TEXT_BOX_FILL, BlendMode::SourceOver),
            transform,
            None,
        );
        let border = PathBuilder::from_rect(frame);
        let stroke = tiny_skia::Stroke {
            width: 1.0,
            ..Default::default()
        };
        pixmap.stroke_path(
            &border,
            &paint(TEXT_BOX_BORDER, BlendMode::SourceOver),
            &stroke,
            transform,
            None,
        );

        // All lit glyph cells go into one path.
        let mut glyphs = PathBuilder::new();
        for (row, line) in lines.iter().enumerate() {
            let top = y0 + TEXT_PADDING + row as f32 * line_height;
            for (column, ch) in line.chars().enumerate() {
                let Some(glyph) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
                    continue;
                };
                let left = x0 + TEXT_PADDING + column as f32 * advance;
                for (gy, bits) in glyph.iter().enumerate() {
                    for gx in 0..8 {
                        if (bits >> gx) & 1 == 0 {
                            continue;
                        }
                        if let Some(cell) = Rect::from_xywh(
                            left + gx as f32 * scale,
                            top + gy as f32 * scale,
                            scale,
                            scale,
                        ) {
                            glyphs.push_rect(cell);
                        }
                    }
                }
            }
        }

        if let Some(path) = glyphs.finish() {
            let mut ink = paint(element.style.color, BlendMode::SourceOver);
            ink.anti_alias = false;
            pixmap.fill_path(&path, &ink, FillRule::Winding, transform, None);
        }
    }
}

impl Renderer for RasterRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        let (width, height) = ctx.output_size();
        let new_pixmap = || {
            Pixmap::new(width, height).ok_or_else(|| {
                RendererError::InitFailed(format!("cannot allocate {width}x{height} surface"))
            })
        };

        let mut base = new_pixmap()?;
        let mut highlights = new_pixmap()?;
        let mut ink = new_pixmap()?;
        let scale = ctx.scale_factor.max(f64::EPSILON) as f32;
        let transform = Transform::from_scale(scale, scale);

        let clear = BoardColor::from(self.background_color(ctx));
        Self::draw_background(&mut base, clear, ctx, transform);

        for stroke in ctx.strokes {
            match stroke.tool {
                StrokeTool::Highlighter => {
                    Self::draw_stroke(&mut highlights, stroke, BlendMode::Source, transform);
                }
                StrokeTool::Pen => {
                    Self::draw_stroke(&mut ink, stroke, BlendMode::SourceOver, transform);
                }
                StrokeTool::EraserMarker => {
                    Self::draw_stroke(&mut highlights, stroke, BlendMode::DestinationOut, transform);
                    Self::draw_stroke(&mut ink, stroke, BlendMode::DestinationOut, transform);
                }
            }
        }

        let multiply = PixmapPaint {
            blend_mode: BlendMode::Multiply,
            ..PixmapPaint::default()
        };
        base.draw_pixmap(0, 0, highlights.as_ref(), &multiply, Transform::identity(), None);
        base.draw_pixmap(
            0,
            0,
            ink.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        for shape in ctx.shapes {
            Self::draw_shape(&mut base, shape, transform);
        }

        if ctx.include_text {
            for element in ctx.texts {
                Self::draw_text(&mut base, element, transform);
            }
        }

        log::debug!(
            "built scene: {} strokes, {} shapes, {} text boxes",
            ctx.strokes.len(),
            ctx.shapes.len(),
            if ctx.include_text { ctx.texts.len() } else { 0 }
        );
        self.pixmap = Some(base);
        Ok(())
    }
}

/// Split text into display lines of at most `per_line` characters.
fn wrap_lines(text: &str, per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let chars: Vec<char> = paragraph.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for chunk in chars.chunks(per_line) {
            lines.push(chunk.iter().collect());
        }
    }
    lines
}

/// Straight (non-premultiplied) RGBA bytes of a pixmap.
pub fn rgba_data(pixmap: &Pixmap) -> Vec<u8> {
    let mut data = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    data
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(e.to_string()))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| RendererError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurukulx_core::shape::{ShapeKind, ShapeStyle};
    use gurukulx_core::stroke::{SamplePoint, StrokeStyle};
    use gurukulx_core::text::{TextLimits, TextStore, TextStyle};
    use kurbo::{Point, Size};

    const SURFACE: Size = Size::new(400.0, 300.0);

    fn stroke(tool: StrokeTool, color: BoardColor, size: f64, points: &[(f64, f64)]) -> Stroke {
        let style = StrokeStyle {
            color,
            size,
            opacity: if tool == StrokeTool::Highlighter { 0.3 } else { 1.0 },
        };
        let mut stroke = Stroke::new(tool, style, None);
        stroke.points = points.iter().map(|&(x, y)| SamplePoint::new(x, y)).collect();
        stroke
    }

    fn pixel(renderer: &RasterRenderer, x: u32, y: u32) -> [u8; 4] {
        let color = renderer.pixmap().unwrap().pixel(x, y).unwrap().demultiply();
        [color.red(), color.green(), color.blue(), color.alpha()]
    }

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    #[test]
    fn test_empty_board_is_white() {
        let mut renderer = RasterRenderer::new();
        renderer.build_scene(&RenderContext::new(&[], SURFACE)).unwrap();
        assert_eq!(pixel(&renderer, 0, 0), WHITE);
        assert_eq!(pixel(&renderer, 399, 299), WHITE);
    }

    #[test]
    fn test_pen_stroke_is_drawn() {
        let strokes = vec![stroke(
            StrokeTool::Pen,
            BoardColor::rgb(255, 0, 0),
            6.0,
            &[(50.0, 50.0), (100.0, 50.0), (150.0, 50.0)],
        )];
        let mut renderer = RasterRenderer::new();
        renderer.build_scene(&RenderContext::new(&strokes, SURFACE)).unwrap();
        assert_eq!(pixel(&renderer, 100, 50), [255, 0, 0, 255]);
        assert_eq!(pixel(&renderer, 100, 80), WHITE);
    }

    #[test]
    fn test_single_point_is_a_dot() {
        let strokes = vec![stroke(StrokeTool::Pen, BoardColor::BLACK, 10.0, &[(20.0, 20.0)])];
        let mut renderer = RasterRenderer::new();
        renderer.build_scene(&RenderContext::new(&strokes, SURFACE)).unwrap();
        assert_eq!(pixel(&renderer, 20, 20), [0, 0, 0, 255]);
    }

    #[test]
    fn test_overlapping_highlights_do_not_darken() {
        let yellow = BoardColor::rgb(250, 204, 21);
        let strokes = vec![
            stroke(StrokeTool::Highlighter, yellow, 20.0, &[(50.0, 100.0), (350.0, 100.0)]),
            stroke(StrokeTool::Highlighter, yellow, 20.0, &[(200.0, 20.0), (200.0, 280.0)]),
        ];
        let mut renderer = RasterRenderer::new();
        renderer.build_scene(&RenderContext::new(&strokes, SURFACE)).unwrap();

        let single = pixel(&renderer, 100, 100);
        let overlap = pixel(&renderer, 200, 100);
        assert_ne!(single, WHITE);
        assert_eq!(single, overlap);
    }

    #[test]
    fn test_highlight_sits_beneath_ink() {
        let strokes = vec![
            stroke(StrokeTool::Pen, BoardColor::rgb(0, 0, 255), 8.0, &[(50.0, 100.0), (350.0, 100.0)]),
            stroke(
                StrokeTool::Highlighter,
                BoardColor::rgb(250, 204, 21),
                20.0,
                &[(50.0, 100.0), (350.0, 100.0)],
            ),
        ];
        let mut renderer = RasterRenderer::new();
        renderer.build_scene(&RenderContext::new(&strokes, SURFACE)).unwrap();
        assert_eq!(pixel(&renderer, 200, 100), [0, 0, 255, 255]);
    }

    #[test]
    fn test_eraser_marker_clears_ink() {
        let strokes = vec![
            stroke(StrokeTool::Pen, BoardColor::BLACK, 6.0, &[(50.0, 50.0), (150.0, 50.0)]),
            stroke(StrokeTool::EraserMarker, BoardColor::BLACK, 30.0, &[(100.0, 20.0), (100.0, 80.0)]),
        ];
        let mut renderer = RasterRenderer::new();
        renderer.build_scene(&RenderContext::new(&strokes, SURFACE)).unwrap();
        assert_eq!(pixel(&renderer, 100, 50), WHITE);
        assert_eq!(pixel(&renderer, 60, 50), [0, 0, 0, 255]);
    }

    fn shape(kind: ShapeKind, from: (f64, f64), to: (f64, f64), style: ShapeStyle) -> Shape {
        Shape::new(kind, Point::new(from.0, from.1), Point::new(to.0, to.1), style, "main".into())
    }

    #[test]
    fn test_rectangle_outline_and_fill() {
        let outline = ShapeStyle {
            color: BoardColor::rgb(0, 0, 255),
            stroke_width: 4.0,
            fill: None,
        };
        let filled = ShapeStyle {
            fill: Some(BoardColor::rgb(0, 255, 0)),
            ..outline.clone()
        };
        let shapes = vec![
            shape(ShapeKind::Rectangle, (50.0, 50.0), (150.0, 150.0), outline),
            shape(ShapeKind::Rectangle, (250.0, 50.0), (350.0, 150.0), filled),
        ];
        let mut renderer = RasterRenderer::new();
        renderer
            .build_scene(&RenderContext::new(&[], SURFACE).with_shapes(&shapes))
            .unwrap();

        assert_eq!(pixel(&renderer, 50, 100), [0, 0, 255, 255]);
        assert_eq!(pixel(&renderer, 100, 100), WHITE);
        assert_eq!(pixel(&renderer, 250, 100), [0, 0, 255, 255]);
        assert_eq!(pixel(&renderer, 300, 100), [0, 255, 0, 255]);
    }

    #[test]
    fn test_shapes_drawn_over_ink() {
        let strokes = vec![stroke(
            StrokeTool::Pen,
            BoardColor::rgb(255, 0, 0),
            10.0,
            &[(20.0, 200.0), (380.0, 200.0)],
        )];
        let line = ShapeStyle {
            color: BoardColor::BLACK,
            stroke_width: 6.0,
            fill: None,
        };
        let shapes = vec![shape(ShapeKind::Line, (200.0, 150.0), (200.0, 250.0), line)];
        let mut renderer = RasterRenderer::new();
        renderer
            .build_scene(&RenderContext::new(&strokes, SURFACE).with_shapes(&shapes))
            .unwrap();
        assert_eq!(pixel(&renderer, 200, 200), [0, 0, 0, 255]);
        assert_eq!(pixel(&renderer, 100, 200), [255, 0, 0, 255]);
    }

    #[test]
    fn test_solid_background() {
        let ctx = RenderContext::new(&[], SURFACE)
            .with_background(Background::Solid(BoardColor::rgb(0xfe, 0xf3, 0xc7)));
        let mut renderer = RasterRenderer::new();
        renderer.build_scene(&ctx).unwrap();
        assert_eq!(pixel(&renderer, 10, 10), [0xfe, 0xf3, 0xc7, 255]);

        let clear = BoardColor::from(renderer.background_color(&ctx));
        assert_eq!(pixel(&renderer, 399, 299), [clear.r, clear.g, clear.b, clear.a]);
    }

    #[test]
    fn test_grid_background() {
        let ctx = RenderContext::new(&[], SURFACE).with_background(Background::Grid);
        let mut renderer = RasterRenderer::new();
        renderer.build_scene(&ctx).unwrap();
        assert_eq!(pixel(&renderer, 10, 10), WHITE);
        let on_rule = (19..=20).any(|x| pixel(&renderer, x, 10) != WHITE);
        assert!(on_rule);
    }

    #[test]
    fn test_text_boxes_optional() {
        let mut store = TextStore::new(TextLimits::default());
        let id = store.create(Point::new(100.0, 100.0), "main".into(), TextStyle::default()).id;
        store.update(
            id,
            gurukulx_core::TextPatch {
                text: Some("H".into()),
                ..Default::default()
            },
        );

        let mut renderer = RasterRenderer::new();
        let ctx = RenderContext::new(&[], SURFACE).with_texts(store.list());
        renderer.build_scene(&ctx).unwrap();
        // Top-left cell of 'H' at 2x scale, inside the padding.
        assert_eq!(pixel(&renderer, 109, 109), [0, 0, 0, 255]);

        renderer.build_scene(&ctx.clone().with_text(false)).unwrap();
        assert_eq!(pixel(&renderer, 109, 109), WHITE);
    }

    #[test]
    fn test_scale_factor() {
        let ctx = RenderContext::new(&[], SURFACE).with_scale_factor(2.0);
        let mut renderer = RasterRenderer::new();
        renderer.build_scene(&ctx).unwrap();
        let pixmap = renderer.pixmap().unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (800, 600));
    }

    #[test]
    fn test_png_signature() {
        let mut renderer = RasterRenderer::new();
        let png = renderer.render_to_png(&RenderContext::new(&[], SURFACE)).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_zero_size_surface_fails() {
        let mut renderer = RasterRenderer::new();
        let err = renderer
            .build_scene(&RenderContext::new(&[], Size::new(0.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, RendererError::InitFailed(_)));
    }

    #[test]
    fn test_wrap_lines() {
        assert_eq!(wrap_lines("abcdef\ngh", 4), vec!["abcd", "ef", "gh"]);
        assert_eq!(wrap_lines("", 4), vec![""]);
    }
}
