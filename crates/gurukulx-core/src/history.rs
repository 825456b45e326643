//! Linear undo/redo history of committed strokes and shapes.

use crate::shape::Shape;
use crate::stroke::Stroke;

/// Default number of snapshots to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// An immutable copy of the committed strokes and shapes at one moment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistorySnapshot {
    strokes: Vec<Stroke>,
    shapes: Vec<Shape>,
}

impl HistorySnapshot {
    pub fn new(strokes: &[Stroke], shapes: &[Shape]) -> Self {
        Self {
            strokes: strokes.to_vec(),
            shapes: shapes.to_vec(),
        }
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn into_parts(self) -> (Vec<Stroke>, Vec<Shape>) {
        (self.strokes, self.shapes)
    }

    /// Strokes plus shapes.
    pub fn len(&self) -> usize {
        self.strokes.len() + self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.shapes.is_empty()
    }
}

/// Snapshot list with a cursor.
///
/// The list always starts with the empty-canvas snapshot and the cursor always
/// points at a valid entry. When the depth cap is exceeded the oldest snapshot
/// after the empty baseline is dropped, so undo can still return to an empty
/// canvas.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    snapshots: Vec<HistorySnapshot>,
    cursor: usize,
    max_depth: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_UNDO_HISTORY)
    }

    /// Create a history retaining at most `max_depth` snapshots (baseline
    /// included). Values below 2 are raised to 2.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            snapshots: vec![HistorySnapshot::default()],
            cursor: 0,
            max_depth: max_depth.max(2),
        }
    }

    /// Record the current committed strokes and shapes.
    ///
    /// Discards any redo branch beyond the cursor, appends, and moves the
    /// cursor to the end.
    pub fn snapshot(&mut self, strokes: &[Stroke], shapes: &[Shape]) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(HistorySnapshot::new(strokes, shapes));

        if self.snapshots.len() > self.max_depth {
            self.snapshots.remove(1);
            log::debug!("history full, dropped oldest snapshot");
        }

        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. Returns `None` at the empty baseline.
    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot. Returns `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of retained snapshots, baseline included.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: the baseline is always present.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Snapshot the cursor points at.
    pub fn current(&self) -> &HistorySnapshot {
        &self.snapshots[self.cursor]
    }

    /// Forget everything and return to the empty baseline.
    pub fn reset(&mut self) {
        self.snapshots.clear();
        self.snapshots.push(HistorySnapshot::default());
        self.cursor = 0;
    }
}
