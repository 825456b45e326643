//! Stroke store: committed strokes plus at most one stroke in progress.

use crate::region::RegionId;
use crate::stroke::{SamplePoint, Stroke, StrokeId, StrokeStyle, StrokeTool};
use kurbo::Point;

/// Owns every stroke on the board.
///
/// Committed strokes are frozen and kept in z-order (back to front); the
/// in-progress stroke lives in a separate slot until it is finalized.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    committed: Vec<Stroke>,
    active: Option<Stroke>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a stroke at `start`.
    ///
    /// Returns `None` without changing anything if a stroke is already in
    /// progress.
    pub fn begin_stroke(
        &mut self,
        tool: StrokeTool,
        style: StrokeStyle,
        start: SamplePoint,
        region: Option<RegionId>,
    ) -> Option<StrokeId> {
        let mut stroke = Stroke::new(tool, style, region);
        stroke.push(start);
        self.begin(stroke)
    }

    /// Put a prepared stroke into the in-progress slot.
    pub fn begin(&mut self, stroke: Stroke) -> Option<StrokeId> {
        if self.active.is_some() {
            log::debug!("begin ignored: stroke already in progress");
            return None;
        }
        let id = stroke.id;
        self.active = Some(stroke);
        Some(id)
    }

    /// Append a sample to the in-progress stroke. No-op when idle.
    pub fn append_point(&mut self, point: SamplePoint) {
        if let Some(stroke) = self.active.as_mut() {
            stroke.push(point);
        }
    }

    /// Commit the in-progress stroke on top of the z-order.
    ///
    /// A stroke without points is discarded instead of committed.
    pub fn finalize_stroke(&mut self) -> Option<&Stroke> {
        let stroke = self.active.take()?;
        if stroke.is_empty() {
            log::debug!("discarding empty stroke {}", stroke.id);
            return None;
        }
        self.committed.push(stroke);
        self.committed.last()
    }

    /// Drop the in-progress stroke without committing it.
    pub fn cancel_stroke(&mut self) -> Option<Stroke> {
        self.active.take()
    }

    /// Remove the topmost committed stroke with a sample within `radius` of
    /// `point`. At most one stroke is removed per call.
    pub fn erase_at(&mut self, point: Point, radius: f64) -> Option<Stroke> {
        let index = self
            .committed
            .iter()
            .rposition(|stroke| stroke.hits(point, radius))?;
        Some(self.committed.remove(index))
    }

    /// Replace the committed list wholesale (used by undo/redo).
    pub fn replace_committed(&mut self, strokes: Vec<Stroke>) {
        self.committed = strokes;
    }

    /// Remove every stroke, including the one in progress.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.active = None;
    }

    /// Committed strokes in z-order (back to front).
    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn active(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.committed.iter().find(|s| s.id == id)
    }

    /// Number of committed strokes.
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen() -> StrokeStyle {
        StrokeStyle::default()
    }

    #[test]
    fn test_begin_twice_is_rejected() {
        let mut store = StrokeStore::new();
        let first = store.begin_stroke(StrokeTool::Pen, pen(), SamplePoint::new(0.0, 0.0), None);
        assert!(first.is_some());
        let second = store.begin_stroke(StrokeTool::Pen, pen(), SamplePoint::new(5.0, 5.0), None);
        assert!(second.is_none());
        assert_eq!(store.active().map(|s| s.id), first);
    }

    #[test]
    fn test_append_without_active_is_noop() {
        let mut store = StrokeStore::new();
        store.append_point(SamplePoint::new(1.0, 1.0));
        assert!(store.active().is_none());
        assert!(store.finalize_stroke().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_finalize_commits_all_points() {
        let mut store = StrokeStore::new();
        store.begin_stroke(StrokeTool::Pen, pen(), SamplePoint::new(0.0, 0.0), None);
        for i in 1..5 {
            store.append_point(SamplePoint::new(i as f64, 0.0));
        }
        let committed = store.finalize_stroke().map(|s| s.len());
        assert_eq!(committed, Some(5));
        assert_eq!(store.len(), 1);
        assert!(!store.is_drawing());
    }

    #[test]
    fn test_zero_point_stroke_is_discarded() {
        let mut store = StrokeStore::new();
        store.begin(Stroke::new(StrokeTool::Pen, pen(), None));
        assert!(store.finalize_stroke().is_none());
        assert!(store.is_empty());
        assert!(!store.is_drawing());
    }

    #[test]
    fn test_eraser_removes_topmost_only() {
        let mut store = StrokeStore::new();
        let mut ids = Vec::new();
        for _ in 0..3 {
            store.begin_stroke(StrokeTool::Pen, pen(), SamplePoint::new(10.0, 10.0), None);
            ids.push(store.finalize_stroke().map(|s| s.id).unwrap());
        }

        let removed = store.erase_at(Point::new(10.0, 10.0), 9.0);
        assert_eq!(removed.map(|s| s.id), Some(ids[2]));
        assert_eq!(store.len(), 2);
        assert_eq!(store.committed()[0].id, ids[0]);
        assert_eq!(store.committed()[1].id, ids[1]);
    }

    #[test]
    fn test_eraser_miss_is_noop() {
        let mut store = StrokeStore::new();
        store.begin_stroke(StrokeTool::Pen, pen(), SamplePoint::new(0.0, 0.0), None);
        store.finalize_stroke();
        assert!(store.erase_at(Point::new(100.0, 100.0), 9.0).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_committed() {
        let mut store = StrokeStore::new();
        store.begin_stroke(StrokeTool::Pen, pen(), SamplePoint::new(0.0, 0.0), None);
        store.finalize_stroke();
        store.replace_committed(Vec::new());
        assert!(store.is_empty());
    }
}
