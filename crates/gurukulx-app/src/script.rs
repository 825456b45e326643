//! Pointer scripts.
//!
//! A script is a JSON array of actions replayed in order against a board,
//! standing in for the pointer and toolbar events of an interactive host:
//!
//! ```json
//! [
//!   { "op": "mount", "x": 0, "y": 0, "width": 1280, "height": 720 },
//!   { "op": "tool", "tool": "highlighter" },
//!   { "op": "stroke", "points": [[100, 100], [200, 120]] },
//!   { "op": "edit_text", "index": 0, "text": "Newton's laws" }
//! ]
//! ```
//!
//! Text boxes are addressed by creation index since their ids are only
//! known at run time.

use anyhow::{Context, Result};
use gurukulx_core::{
    Background, BoardColor, BoardEvent, PointerEvent, TextAction, TextId, TextPatch, ToolKind,
    WhiteboardState,
};
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Mount the surface at a rendered screen rectangle.
    Mount {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Unmount,
    Tool {
        tool: ToolKind,
    },
    Color {
        color: BoardColor,
    },
    Size {
        size: f64,
    },
    Opacity {
        opacity: f64,
    },
    /// Fill for closed shapes; `null` draws outlines only.
    Fill {
        #[serde(default)]
        color: Option<BoardColor>,
    },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        pressure: Option<f64>,
    },
    Move {
        x: f64,
        y: f64,
        #[serde(default)]
        pressure: Option<f64>,
    },
    Up,
    /// Down, moves and up in one action.
    Stroke {
        points: Vec<[f64; 2]>,
    },
    EditText {
        index: usize,
        text: String,
        #[serde(default)]
        caret: Option<usize>,
    },
    UpdateText {
        index: usize,
        patch: TextPatch,
    },
    DeleteText {
        index: usize,
    },
    Undo,
    Redo,
    Clear,
    ZoomIn,
    ZoomOut,
    Pan {
        dx: f64,
        dy: f64,
    },
    ResetView,
    Background {
        background: Background,
    },
    ToggleGrid,
}

/// Read a script file.
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<Vec<ScriptAction>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&content).with_context(|| format!("Invalid script {}", path.display()))
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptAction>> {
    Ok(serde_json::from_str(content)?)
}

/// Replays actions against one board.
pub struct ScriptRunner<'a> {
    board: &'a mut WhiteboardState,
    clock: u64,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(board: &'a mut WhiteboardState) -> Self {
        Self { board, clock: 0 }
    }

    fn event(&mut self, x: f64, y: f64, pressure: Option<f64>) -> PointerEvent {
        self.clock += 16;
        let event = PointerEvent::new(x, y).at(self.clock);
        match pressure {
            Some(pressure) => event.with_pressure(pressure),
            None => event,
        }
    }

    fn text_action(
        &self,
        index: usize,
        build: impl FnOnce(TextId) -> TextAction,
    ) -> Option<TextAction> {
        match self.board.texts().get(index) {
            Some(element) => Some(build(element.id)),
            None => {
                log::warn!("script refers to missing text box #{index}");
                None
            }
        }
    }

    pub fn apply(&mut self, action: &ScriptAction) {
        match action {
            ScriptAction::Mount {
                x,
                y,
                width,
                height,
            } => self
                .board
                .mount_surface(Rect::new(*x, *y, x + width, y + height)),
            ScriptAction::Unmount => self.board.unmount_surface(),
            ScriptAction::Tool { tool } => self.board.set_tool(*tool),
            ScriptAction::Color { color } => self.board.set_color(*color),
            ScriptAction::Size { size } => self.board.set_size(*size),
            ScriptAction::Opacity { opacity } => self.board.set_opacity(*opacity),
            ScriptAction::Fill { color } => self.board.set_fill(*color),
            ScriptAction::Down { x, y, pressure } => {
                let event = self.event(*x, *y, *pressure);
                self.board.pointer_down(&event);
            }
            ScriptAction::Move { x, y, pressure } => {
                let event = self.event(*x, *y, *pressure);
                self.board.pointer_move(&event);
            }
            ScriptAction::Up => {
                self.board.pointer_up();
            }
            ScriptAction::Stroke { points } => {
                let Some(([x, y], rest)) = points.split_first() else {
                    return;
                };
                let down = self.event(*x, *y, None);
                self.board.pointer_down(&down);
                for [x, y] in rest {
                    let event = self.event(*x, *y, None);
                    self.board.pointer_move(&event);
                }
                self.board.pointer_up();
            }
            ScriptAction::EditText { index, text, caret } => {
                let caret = caret.unwrap_or_else(|| text.chars().count());
                if let Some(action) = self.text_action(*index, |id| TextAction::Edit {
                    id,
                    text: text.clone(),
                    caret,
                }) {
                    self.board.apply_text_action(action);
                }
            }
            ScriptAction::UpdateText { index, patch } => {
                if let Some(action) = self.text_action(*index, |id| TextAction::Update {
                    id,
                    patch: patch.clone(),
                }) {
                    self.board.apply_text_action(action);
                }
            }
            ScriptAction::DeleteText { index } => {
                if let Some(action) = self.text_action(*index, |id| TextAction::Delete { id }) {
                    self.board.apply_text_action(action);
                }
            }
            ScriptAction::Undo => {
                self.board.undo();
            }
            ScriptAction::Redo => {
                self.board.redo();
            }
            ScriptAction::Clear => self.board.clear(),
            ScriptAction::ZoomIn => self.board.zoom_in(),
            ScriptAction::ZoomOut => self.board.zoom_out(),
            ScriptAction::Pan { dx, dy } => self.board.pan(Vec2::new(*dx, *dy)),
            ScriptAction::ResetView => self.board.reset_view(),
            ScriptAction::Background { background } => self.board.set_background(*background),
            ScriptAction::ToggleGrid => self.board.toggle_grid(),
        }
    }

    /// Apply every action and return the board events they produced.
    pub fn run(mut self, actions: &[ScriptAction]) -> Vec<BoardEvent> {
        for action in actions {
            self.apply(action);
        }
        // Leave no gesture half done.
        self.board.pointer_up();
        self.board.drain_events()
    }
}

/// Replay `actions` on `board`.
pub fn replay(board: &mut WhiteboardState, actions: &[ScriptAction]) -> Vec<BoardEvent> {
    ScriptRunner::new(board).run(actions)
}
