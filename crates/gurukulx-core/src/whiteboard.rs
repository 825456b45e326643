//! The whiteboard aggregate: one editing session's state and its pointer
//! state machine.

use crate::background::Background;
use crate::camera::Camera;
use crate::caret::normalize_with_caret;
use crate::color::BoardColor;
use crate::config::BoardConfig;
use crate::events::{BoardEvent, EventQueue, TextAction};
use crate::history::{HistoryManager, HistorySnapshot};
use crate::mapper::{PointerEvent, Surface, map_to_canonical};
use crate::region::{Region, classify};
use crate::shape::{Shape, ShapeId, ShapeKind, ShapeStore};
use crate::store::StrokeStore;
use crate::stroke::{SamplePoint, Stroke, StrokeId};
use crate::summary::BoardSummary;
use crate::text::{TextElement, TextId, TextPatch, TextStore, TextStyle};
use crate::tools::{ToolKind, ToolSettings};
use kurbo::{Point, Rect, Vec2};

/// What a pointer-down did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    StrokeStarted(StrokeId),
    /// Shape drag started; the shape is committed on pointer-up.
    ShapeStarted(ShapeKind),
    TextCreated(TextId),
    /// Eraser gesture started; carries the stroke removed by this event.
    Erased(Option<StrokeId>),
    /// Surface not mounted or a gesture already running.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    Drawing,
    Shaping {
        kind: ShapeKind,
        start: Point,
        end: Point,
    },
    Erasing {
        removed: usize,
    },
}

/// Live state of one whiteboard session.
///
/// Owns the stroke, shape and text stores, the history and the view. All
/// input goes through the pointer methods; changes are reported through the
/// event queue.
#[derive(Debug, Clone)]
pub struct WhiteboardState {
    config: BoardConfig,
    surface: Surface,
    camera: Camera,
    strokes: StrokeStore,
    shapes: ShapeStore,
    texts: TextStore,
    history: HistoryManager,
    settings: ToolSettings,
    background: Background,
    selected_text: Option<TextId>,
    gesture: Gesture,
    events: EventQueue,
}

impl Default for WhiteboardState {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl WhiteboardState {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            surface: Surface::new(config.surface.size()),
            camera: config.view.camera(),
            strokes: StrokeStore::new(),
            shapes: ShapeStore::new(),
            texts: TextStore::new(config.text.limits),
            history: HistoryManager::with_max_depth(config.history.max_depth),
            settings: ToolSettings::default(),
            background: config.background,
            selected_text: None,
            gesture: Gesture::Idle,
            events: EventQueue::new(),
            config,
        }
    }

    // --- Surface and view ---

    /// Record where the surface is rendered in client space.
    pub fn mount_surface(&mut self, rendered: Rect) {
        self.surface.mount(rendered);
    }

    pub fn unmount_surface(&mut self) {
        self.surface.unmount();
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Where a surface laid out at `base` is displayed under the current view.
    /// Hosts mount that box so pointer mapping stays in canonical space.
    pub fn view_box(&self, base: Rect) -> Rect {
        self.camera.display_box(base)
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.camera.pan(delta);
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn toggle_grid(&mut self) {
        self.background = self.background.toggle_grid();
    }

    // --- Tools ---

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.settings.tool = tool;
    }

    pub fn set_color(&mut self, color: BoardColor) {
        self.settings.color = color;
    }

    pub fn set_size(&mut self, size: f64) {
        if size > 0.0 {
            self.settings.size = size;
        }
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.settings.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Fill used by closed shapes drawn from now on.
    pub fn set_fill(&mut self, fill: Option<BoardColor>) {
        self.settings.fill = fill;
    }

    // --- Pointer input ---

    fn canonical(&self, event: &PointerEvent) -> SamplePoint {
        map_to_canonical(event, &self.surface)
    }

    fn region_at(&self, point: Point) -> String {
        classify(point, self.surface.logical, &self.config.regions).to_string()
    }

    pub fn pointer_down(&mut self, event: &PointerEvent) -> PointerOutcome {
        if !self.surface.is_mounted() {
            log::debug!("pointer down ignored: surface not mounted");
            return PointerOutcome::Ignored;
        }
        if self.gesture != Gesture::Idle {
            return PointerOutcome::Ignored;
        }

        let sample = self.canonical(event);
        let region = self.region_at(sample.pos());

        match self.settings.tool {
            ToolKind::Text => {
                let style = TextStyle {
                    font_size: self.config.text.font_size,
                    color: self.settings.color,
                    ..TextStyle::default()
                };
                let id = self.texts.create(sample.pos(), region.clone(), style).id;
                self.selected_text = Some(id);
                self.events.push(BoardEvent::TextCreated { id, region });
                PointerOutcome::TextCreated(id)
            }
            ToolKind::Eraser => {
                self.gesture = Gesture::Erasing { removed: 0 };
                PointerOutcome::Erased(self.erase_step(sample.pos()))
            }
            tool => {
                if let Some(kind) = tool.shape_kind() {
                    let start = sample.pos();
                    self.gesture = Gesture::Shaping {
                        kind,
                        start,
                        end: start,
                    };
                    return PointerOutcome::ShapeStarted(kind);
                }
                let Some(stroke_tool) = tool.stroke_tool() else {
                    return PointerOutcome::Ignored;
                };
                let style = self.settings.stroke_style(self.config.highlighter.opacity);
                match self
                    .strokes
                    .begin_stroke(stroke_tool, style, sample, Some(region))
                {
                    Some(id) => {
                        self.gesture = Gesture::Drawing;
                        PointerOutcome::StrokeStarted(id)
                    }
                    None => PointerOutcome::Ignored,
                }
            }
        }
    }

    /// Extend the running gesture. Events are applied in arrival order.
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        if !self.surface.is_mounted() {
            return;
        }
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Drawing => {
                let sample = self.canonical(event);
                self.strokes.append_point(sample);
            }
            Gesture::Shaping { kind, start, .. } => {
                let end = self.canonical(event).pos();
                self.gesture = Gesture::Shaping { kind, start, end };
            }
            Gesture::Erasing { .. } => {
                let point = self.canonical(event).pos();
                self.erase_step(point);
            }
        }
    }

    /// End the running gesture. Returns the id of a committed stroke.
    ///
    /// Committing a stroke or a shape, or finishing an eraser drag that
    /// removed anything, records one history snapshot.
    pub fn pointer_up(&mut self) -> Option<StrokeId> {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => None,
            Gesture::Drawing => {
                let (id, region) = {
                    let stroke = self.strokes.finalize_stroke()?;
                    (stroke.id, stroke.region.clone())
                };
                self.record_history();
                self.events.push(BoardEvent::StrokeCommitted { id, region });
                log::debug!("stroke {id} committed, {} on board", self.strokes.len());
                Some(id)
            }
            Gesture::Shaping { kind, start, end } => {
                self.commit_shape(kind, start, end);
                None
            }
            Gesture::Erasing { removed } => {
                if removed > 0 {
                    self.record_history();
                }
                None
            }
        }
    }

    fn commit_shape(&mut self, kind: ShapeKind, start: Point, end: Point) -> Option<ShapeId> {
        let region = self.region_at(start);
        let shape = Shape::new(kind, start, end, self.settings.shape_style(), region);
        let (id, region) = {
            let shape = self.shapes.add(shape)?;
            (shape.id, shape.region.clone())
        };
        self.record_history();
        self.events.push(BoardEvent::ShapeCommitted { id, region });
        log::debug!("{kind:?} {id} committed, {} shapes on board", self.shapes.len());
        Some(id)
    }

    fn erase_step(&mut self, point: Point) -> Option<StrokeId> {
        let radius = self.settings.eraser_radius(self.config.eraser.radius_factor);
        let removed = self.strokes.erase_at(point, radius)?;
        if let Gesture::Erasing { removed: count } = &mut self.gesture {
            *count += 1;
        }
        self.events.push(BoardEvent::StrokeErased { id: removed.id });
        Some(removed.id)
    }

    // --- History ---

    fn record_history(&mut self) {
        self.history
            .snapshot(self.strokes.committed(), self.shapes.list());
    }

    fn restore(&mut self, snapshot: HistorySnapshot) {
        let (strokes, shapes) = snapshot.into_parts();
        self.strokes.replace_committed(strokes);
        self.shapes.replace(shapes);
        self.events.push(BoardEvent::HistoryMoved {
            cursor: self.history.cursor(),
        });
    }

    /// Step back in history. Any gesture in progress is dropped.
    pub fn undo(&mut self) -> bool {
        self.abort_gesture();
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Step forward in history. Any gesture in progress is dropped.
    pub fn redo(&mut self) -> bool {
        self.abort_gesture();
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn abort_gesture(&mut self) {
        if let Gesture::Erasing { removed } = self.gesture {
            if removed > 0 {
                self.record_history();
            }
        }
        if self.strokes.cancel_stroke().is_some() {
            log::debug!("in-progress stroke dropped");
        }
        self.gesture = Gesture::Idle;
    }

    /// Remove all strokes, shapes and text boxes. Undo restores the strokes
    /// and shapes.
    pub fn clear(&mut self) {
        self.abort_gesture();
        self.strokes.clear();
        self.shapes.clear();
        self.texts.clear();
        self.selected_text = None;
        self.record_history();
        self.events.push(BoardEvent::Cleared);
    }

    // --- Text ---

    pub fn selected_text(&self) -> Option<TextId> {
        self.selected_text
    }

    pub fn select_text(&mut self, id: Option<TextId>) {
        self.selected_text = id.filter(|id| self.texts.get(*id).is_some());
    }

    /// Dispatch an action raised by a rendered text box.
    pub fn apply_text_action(&mut self, action: TextAction) -> bool {
        match action {
            TextAction::Update { id, patch } => self.update_text(id, patch),
            TextAction::Edit { id, text, caret } => self.edit_text(id, &text, caret).is_some(),
            TextAction::Delete { id } => self.delete_text(id),
        }
    }

    /// Apply a partial update. Moving a box re-classifies its region.
    pub fn update_text(&mut self, id: TextId, patch: TextPatch) -> bool {
        let moves = patch.moves();
        let Some(position) = self.texts.update(id, patch).map(TextElement::position) else {
            return false;
        };
        if moves {
            let region = self.region_at(position);
            self.texts.set_region(id, region);
        }
        self.events.push(BoardEvent::TextUpdated { id });
        true
    }

    /// Replace a box's content with normalized text. Returns the caret
    /// position (character index) after normalization.
    pub fn edit_text(&mut self, id: TextId, text: &str, caret: usize) -> Option<usize> {
        let (normalized, caret) = normalize_with_caret(text, caret);
        let patch = TextPatch {
            text: Some(normalized),
            ..TextPatch::default()
        };
        self.texts.update(id, patch)?;
        self.events.push(BoardEvent::TextUpdated { id });
        Some(caret)
    }

    pub fn delete_text(&mut self, id: TextId) -> bool {
        if self.texts.delete(id).is_none() {
            return false;
        }
        if self.selected_text == Some(id) {
            self.selected_text = None;
        }
        self.events.push(BoardEvent::TextDeleted { id });
        true
    }

    // --- Read access and export ---

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn regions(&self) -> &[Region] {
        &self.config.regions
    }

    /// Committed strokes in z-order.
    pub fn strokes(&self) -> &[Stroke] {
        self.strokes.committed()
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.strokes.active()
    }

    /// Committed shapes in z-order.
    pub fn shapes(&self) -> &[Shape] {
        self.shapes.list()
    }

    /// The shape being dragged out, as it would be committed now.
    pub fn shape_preview(&self) -> Option<Shape> {
        match self.gesture {
            Gesture::Shaping { kind, start, end } => Some(Shape::new(
                kind,
                start,
                end,
                self.settings.shape_style(),
                self.region_at(start),
            )),
            _ => None,
        }
    }

    pub fn texts(&self) -> &[TextElement] {
        self.texts.list()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Digest of committed content. A stroke in progress is not included.
    pub fn export_summary(&self) -> BoardSummary {
        BoardSummary::collect(
            self.strokes.committed(),
            self.texts.list(),
            self.shapes.list(),
            &self.config.regions,
            self.background,
            self.camera.zoom,
        )
    }

    /// Take all events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.events.drain().collect()
    }
}
