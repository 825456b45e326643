//! Structured digest of the board for the AI-assist collaborator.

use crate::background::Background;
use crate::region::Region;
use crate::shape::Shape;
use crate::stroke::Stroke;
use crate::text::TextElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-region breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub id: String,
    pub name: String,
    pub stroke_count: usize,
    pub text_count: usize,
    pub shape_count: usize,
}

/// What is on the board, without pixel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub stroke_count: usize,
    pub text_count: usize,
    pub shape_count: usize,
    /// Committed strokes per configured region. Every region is present.
    pub per_region_counts: BTreeMap<String, usize>,
    pub background_mode: String,
    pub zoom: f64,
    pub regions: Vec<RegionSummary>,
}

impl BoardSummary {
    /// Summarize committed strokes, text elements and shapes.
    pub fn collect(
        strokes: &[Stroke],
        texts: &[TextElement],
        shapes: &[Shape],
        regions: &[Region],
        background: Background,
        zoom: f64,
    ) -> Self {
        let mut per_region_counts: BTreeMap<String, usize> =
            regions.iter().map(|r| (r.id.clone(), 0)).collect();
        for stroke in strokes {
            if let Some(region) = &stroke.region {
                *per_region_counts.entry(region.clone()).or_insert(0) += 1;
            }
        }

        let regions = regions
            .iter()
            .map(|region| RegionSummary {
                id: region.id.clone(),
                name: region.name.clone(),
                stroke_count: per_region_counts.get(&region.id).copied().unwrap_or(0),
                text_count: texts.iter().filter(|t| t.region == region.id).count(),
                shape_count: shapes.iter().filter(|s| s.region == region.id).count(),
            })
            .collect();

        Self {
            stroke_count: strokes.len(),
            text_count: texts.len(),
            shape_count: shapes.len(),
            per_region_counts,
            background_mode: background.mode(),
            zoom,
            regions,
        }
    }

    /// Free-text context line for AI-assist requests.
    pub fn context_line(&self) -> String {
        format!(
            "Current whiteboard has {} strokes and {} text elements. Background: {}.",
            self.stroke_count, self.text_count, self.background_mode
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::default_regions;
    use crate::shape::{ShapeKind, ShapeStyle};
    use crate::stroke::{SamplePoint, StrokeStyle, StrokeTool};
    use kurbo::Point;

    fn stroke_in(region: &str) -> Stroke {
        let mut stroke = Stroke::new(StrokeTool::Pen, StrokeStyle::default(), Some(region.into()));
        stroke.push(SamplePoint::new(0.0, 0.0));
        stroke
    }

    #[test]
    fn test_every_region_reported() {
        let summary = BoardSummary::collect(&[], &[], &[], &default_regions(), Background::White, 1.0);
        assert_eq!(summary.per_region_counts.len(), 4);
        assert!(summary.per_region_counts.values().all(|&n| n == 0));
    }

    #[test]
    fn test_counts_per_region() {
        let strokes = vec![stroke_in("notes"), stroke_in("notes"), stroke_in("main")];
        let summary =
            BoardSummary::collect(&strokes, &[], &[], &default_regions(), Background::Grid, 1.2);
        assert_eq!(summary.stroke_count, 3);
        assert_eq!(summary.per_region_counts["notes"], 2);
        assert_eq!(summary.per_region_counts["main"], 1);
        assert_eq!(summary.per_region_counts["scratch"], 0);
        assert_eq!(summary.regions[1].stroke_count, 2);
    }

    #[test]
    fn test_json_field_names() {
        let summary = BoardSummary::collect(&[], &[], &[], &default_regions(), Background::Grid, 1.0);
        let value: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(value["strokeCount"], 0);
        assert_eq!(value["backgroundMode"], "grid");
        assert_eq!(value["perRegionCounts"]["formulas"], 0);
        assert_eq!(value["regions"][0]["textCount"], 0);
        assert_eq!(value["shapeCount"], 0);
        assert_eq!(value["regions"][0]["shapeCount"], 0);
    }

    #[test]
    fn test_shapes_counted_per_region() {
        let shape = |region: &str| {
            Shape::new(
                ShapeKind::Triangle,
                Point::new(0.0, 0.0),
                Point::new(20.0, 20.0),
                ShapeStyle::default(),
                region.into(),
            )
        };
        let shapes = vec![shape("formulas"), shape("formulas"), shape("main")];
        let summary =
            BoardSummary::collect(&[], &[], &shapes, &default_regions(), Background::White, 1.0);
        assert_eq!(summary.shape_count, 3);
        assert_eq!(summary.stroke_count, 0);
        assert_eq!(summary.regions[0].shape_count, 1);
        assert_eq!(summary.regions[2].shape_count, 2);
        assert_eq!(summary.per_region_counts["formulas"], 0);
    }

    #[test]
    fn test_context_line() {
        let strokes = vec![stroke_in("main")];
        let summary =
            BoardSummary::collect(&strokes, &[], &[], &default_regions(), Background::White, 1.0);
        assert_eq!(
            summary.context_line(),
            "Current whiteboard has 1 strokes and 0 text elements. Background: white."
        );
    }
}
