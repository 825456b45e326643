//! Board configuration loaded from TOML.
//!
//! Every section has defaults, so a partial file (or none at all) is valid:
//!
//! ```toml
//! [surface]
//! width = 1920
//! height = 1080
//!
//! [history]
//! max_depth = 100
//!
//! [[regions]]
//! id = "main"
//! name = "Main Board"
//! x = 0
//! y = 0
//! width = 100
//! height = 100
//! ```

use crate::background::Background;
use crate::camera::{Camera, ZOOM_STEP};
use crate::history::MAX_UNDO_HISTORY;
use crate::region::{Region, default_regions};
use crate::text::TextLimits;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Logical size of the drawing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl SurfaceConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Snapshots kept, empty baseline included.
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_UNDO_HISTORY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraserConfig {
    /// Hit radius as a multiple of the tool size.
    pub radius_factor: f64,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self { radius_factor: 3.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlighterConfig {
    pub opacity: f64,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self { opacity: 0.3 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Font size of new text boxes.
    pub font_size: f64,
    #[serde(flatten)]
    pub limits: TextLimits,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            limits: TextLimits::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl ViewConfig {
    pub fn camera(&self) -> Camera {
        Camera::with_limits(self.min_zoom, self.max_zoom, self.zoom_step)
    }
}

/// Whiteboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub background: Background,
    pub surface: SurfaceConfig,
    pub history: HistoryConfig,
    pub eraser: EraserConfig,
    pub highlighter: HighlighterConfig,
    pub text: TextConfig,
    pub view: ViewConfig,
    /// Regions in classification order.
    pub regions: Vec<Region>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            background: Background::default(),
            surface: SurfaceConfig::default(),
            history: HistoryConfig::default(),
            eraser: EraserConfig::default(),
            highlighter: HighlighterConfig::default(),
            text: TextConfig::default(),
            view: ViewConfig::default(),
            regions: default_regions(),
        }
    }
}

impl BoardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loading board config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check values that would leave the board unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.surface.width) || !is_positive(self.surface.height) {
            return Err(ConfigError::Invalid(format!(
                "surface size must be positive, got {}x{}",
                self.surface.width, self.surface.height
            )));
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.id.is_empty() {
                return Err(ConfigError::Invalid("region id must not be empty".into()));
            }
            if !seen.insert(region.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate region id {:?}",
                    region.id
                )));
            }
            if !is_positive(region.width) || !is_positive(region.height) {
                return Err(ConfigError::Invalid(format!(
                    "region {:?} must have a positive size",
                    region.id
                )));
            }
        }

        if self.history.max_depth < 2 {
            return Err(ConfigError::Invalid(
                "history.max_depth must be at least 2".into(),
            ));
        }
        if self.eraser.radius_factor <= 0.0 {
            return Err(ConfigError::Invalid(
                "eraser.radius_factor must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.highlighter.opacity) {
            return Err(ConfigError::Invalid(
                "highlighter.opacity must be within 0..=1".into(),
            ));
        }

        let limits = &self.text.limits;
        if limits.min_font_size <= 0.0 || limits.min_font_size > limits.max_font_size {
            return Err(ConfigError::Invalid("text font size range is empty".into()));
        }

        let view = &self.view;
        if view.min_zoom <= 0.0 || view.min_zoom > view.max_zoom || view.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "invalid zoom settings: {}..={} step {}",
                view.min_zoom, view.max_zoom, view.zoom_step
            )));
        }

        Ok(())
    }
}

/// Finite and strictly greater than zero.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let config = BoardConfig::from_toml_str("").unwrap();
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.regions.len(), 4);
        assert_eq!(config.history.max_depth, 50);
        assert_eq!(config.text.limits.min_width, 100.0);
    }

    #[test]
    fn test_partial_sections() {
        let config = BoardConfig::from_toml_str(
            r#"
            background = "grid"

            [surface]
            width = 800

            [text]
            max_font_size = 48
            "#,
        )
        .unwrap();
        assert_eq!(config.surface.width, 800.0);
        assert_eq!(config.surface.height, 720.0);
        assert_eq!(config.background, Background::Grid);
        assert_eq!(config.text.limits.max_font_size, 48.0);
        assert_eq!(config.text.font_size, 16.0);
    }

    #[test]
    fn test_custom_regions() {
        let config = BoardConfig::from_toml_str(
            r#"
            [[regions]]
            id = "left"
            name = "Left"
            x = 0
            y = 0
            width = 50
            height = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.regions.len(), 1);
        assert_eq!(config.regions[0].id, "left");
    }

    #[test]
    fn test_rejects_duplicate_regions() {
        let mut config = BoardConfig::default();
        config.regions.push(config.regions[0].clone());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_non_finite_sizes() {
        let err = BoardConfig::from_toml_str("[surface]\nwidth = nan").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(BoardConfig::from_toml_str("[surface]\nheight = inf").is_err());

        let mut config = BoardConfig::default();
        config.regions[0].width = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_bad_zoom() {
        let mut config = BoardConfig::default();
        config.view.zoom_step = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[eraser]\nradius_factor = 2.5").unwrap();
        let config = BoardConfig::load(file.path()).unwrap();
        assert_eq!(config.eraser.radius_factor, 2.5);
    }

    #[test]
    fn test_missing_file() {
        let err = BoardConfig::load("/nonexistent/board.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = BoardConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(BoardConfig::from_toml_str(&text).unwrap(), config);
    }
}
