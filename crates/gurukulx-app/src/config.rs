//! Application configuration.
//!
//! One TOML file with a `[board]` and an `[assist]` section. Missing
//! sections and keys fall back to defaults.

use anyhow::{Context, Result};
use gurukulx_assist::AssistConfig;
use gurukulx_core::BoardConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub assist: AssistConfig,
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.board.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env();
        Ok(config)
    }

    /// Environment variables override file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(url) = std::env::var("GURUKULX_ASSIST_URL") {
            self.assist.base_url = url;
        }
        if let Some(secs) = std::env::var("GURUKULX_ASSIST_TIMEOUT")
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            self.assist.timeout_secs = secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurukulx_core::Background;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.board.history.max_depth, 50);
        assert_eq!(config.assist.timeout_secs, 30);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[board]
background = "grid"

[assist]
mock_delay_ms = 0
"#
        )
        .unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.board.background, Background::Grid);
        assert_eq!(config.assist.mock_delay_ms, 0);
        assert_eq!(config.assist.timeout_secs, 30);
        assert_eq!(config.board.regions.len(), 4);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from_file(dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_invalid_board_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[board.surface]\nwidth = 0.0").unwrap();
        assert!(AppConfig::load_from_file(file.path()).is_err());
    }
}
