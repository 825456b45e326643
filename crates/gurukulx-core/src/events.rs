//! Board events and text actions.
//!
//! Hosts render text boxes with controls (edit, delete) that must reach the
//! board. Those controls produce [`TextAction`] values that the owning board
//! dispatches; the board reports what changed through its [`EventQueue`].

use crate::region::RegionId;
use crate::shape::ShapeId;
use crate::stroke::StrokeId;
use crate::text::{TextId, TextPatch};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::collections::vec_deque::Drain;

/// Action raised by a rendered text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TextAction {
    /// Partial update (move, resize, restyle).
    Update { id: TextId, patch: TextPatch },
    /// Content edit with the caret position (character index) at edit time.
    Edit {
        id: TextId,
        text: String,
        #[serde(default)]
        caret: usize,
    },
    Delete { id: TextId },
}

/// Something that changed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    StrokeCommitted { id: StrokeId, region: Option<RegionId> },
    StrokeErased { id: StrokeId },
    ShapeCommitted { id: ShapeId, region: RegionId },
    TextCreated { id: TextId, region: RegionId },
    TextUpdated { id: TextId },
    TextDeleted { id: TextId },
    /// Undo or redo moved the history cursor.
    HistoryMoved { cursor: usize },
    Cleared,
}

/// FIFO of board events, owned by one board.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<BoardEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BoardEvent) {
        self.events.push_back(event);
    }

    /// Take all pending events in the order they happened.
    pub fn drain(&mut self) -> Drain<'_, BoardEvent> {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = EventQueue::new();
        queue.push(BoardEvent::Cleared);
        queue.push(BoardEvent::HistoryMoved { cursor: 2 });
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![BoardEvent::Cleared, BoardEvent::HistoryMoved { cursor: 2 }]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_json_tag() {
        let value = serde_json::to_value(BoardEvent::HistoryMoved { cursor: 1 }).unwrap();
        assert_eq!(value["type"], "history_moved");
        assert_eq!(value["cursor"], 1);
    }

    #[test]
    fn test_text_action_from_json() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"action":"delete","id":"{id}"}}"#);
        let action: TextAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, TextAction::Delete { id });
    }
}
