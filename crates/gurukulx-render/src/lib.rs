//! GurukulX Render Library
//!
//! Render/export adapter for the GurukulX whiteboard. Rasterizes committed
//! strokes and text boxes on the CPU and encodes the result as PNG.

pub mod export;
mod raster;
mod renderer;

pub use export::{export_file_name, export_raster, now_millis, to_data_uri, write_export};
pub use raster::{RasterRenderer, encode_png, rgba_data};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
