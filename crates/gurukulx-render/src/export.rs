//! Local export: file naming, data URIs and writing PNG files.

use crate::raster::RasterRenderer;
use crate::renderer::{RenderContext, RenderResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use gurukulx_core::WhiteboardState;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Download name for an export taken at `millis`.
pub fn export_file_name(millis: u128) -> String {
    format!("whiteboard-{millis}.png")
}

/// Encode PNG bytes as a `data:` URI for the vision collaborator.
pub fn to_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Rasterize the committed content of `board` at its native resolution.
pub fn export_raster(board: &WhiteboardState, include_text: bool) -> RenderResult<Vec<u8>> {
    let ctx = RenderContext::from_board(board).with_text(include_text);
    RasterRenderer::new().render_to_png(&ctx)
}

/// Write `png` into `dir` under a timestamped name and return the path.
pub fn write_export(dir: &Path, png: &[u8], millis: u128) -> RenderResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(millis));
    std::fs::write(&path, png)?;
    log::info!("exported {} bytes to {}", png.len(), path.display());
    Ok(path)
}
