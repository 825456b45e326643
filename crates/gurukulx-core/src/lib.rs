//! GurukulX Core Library
//!
//! Headless drawing and annotation engine for the GurukulX whiteboard:
//! pointer mapping, region classification, strokes, shapes, history and text
//! boxes.

pub mod background;
pub mod camera;
pub mod caret;
pub mod color;
pub mod config;
pub mod events;
pub mod history;
pub mod mapper;
pub mod region;
pub mod shape;
pub mod store;
pub mod stroke;
pub mod summary;
pub mod text;
pub mod tools;
pub mod whiteboard;

pub use background::Background;
pub use camera::Camera;
pub use caret::{CaretAnchor, normalize_text, normalize_with_caret};
pub use color::{BoardColor, ColorParseError};
pub use config::{BoardConfig, ConfigError};
pub use events::{BoardEvent, EventQueue, TextAction};
pub use history::{HistoryManager, HistorySnapshot};
pub use mapper::{PointerEvent, Surface, map_to_canonical};
pub use region::{DEFAULT_REGION, Region, RegionId, classify, default_regions};
pub use shape::{Shape, ShapeId, ShapeKind, ShapeStore, ShapeStyle};
pub use store::StrokeStore;
pub use stroke::{SamplePoint, Stroke, StrokeId, StrokeStyle, StrokeTool};
pub use summary::{BoardSummary, RegionSummary};
pub use text::{TextElement, TextId, TextLimits, TextPatch, TextStore, TextStyle};
pub use tools::{ToolKind, ToolSettings};
pub use whiteboard::{PointerOutcome, WhiteboardState};
