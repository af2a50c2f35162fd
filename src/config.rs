//! Editor preferences.
//!
//! Read once at startup from `$TEMPLATE_STUDIO_CONFIG`, or from
//! `template-studio.json` in the working directory. Missing fields take their
//! defaults; a missing file is not an error.

use crate::error::Result;
use crate::project::{AspectRatio, DEFAULT_UNDO_DEPTH};
use crate::timeline::{Zoom, AUTOSCROLL_MARGIN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "TEMPLATE_STUDIO_CONFIG";
pub const CONFIG_FILE_NAME: &str = "template-studio.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub undo_depth: usize,
    pub autoscroll_margin: f64,
    /// Seconds into the source for library thumbnails
    pub thumbnail_time: f64,
    pub default_aspect_ratio: AspectRatio,
    pub default_zoom: Zoom,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            undo_depth: DEFAULT_UNDO_DEPTH,
            autoscroll_margin: AUTOSCROLL_MARGIN,
            thumbnail_time: 1.0,
            default_aspect_ratio: AspectRatio::default(),
            default_zoom: Zoom::default(),
        }
    }
}

impl EditorConfig {
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from the default location, falling back to defaults on any problem
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.undo_depth == 0 {
            self.undo_depth = defaults.undo_depth;
        }
        if !self.autoscroll_margin.is_finite() || self.autoscroll_margin < 0.0 {
            self.autoscroll_margin = defaults.autoscroll_margin;
        }
        if !self.thumbnail_time.is_finite() || self.thumbnail_time < 0.0 {
            self.thumbnail_time = defaults.thumbnail_time;
        }
        if self.ffmpeg_path.trim().is_empty() {
            self.ffmpeg_path = defaults.ffmpeg_path;
        }
        if self.ffprobe_path.trim().is_empty() {
            self.ffprobe_path = defaults.ffprobe_path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = EditorConfig::from_json(
            r#"{
                "ffmpeg_path": "/opt/ffmpeg/bin/ffmpeg",
                "undo_depth": 10,
                "default_aspect_ratio": "9:16",
                "default_zoom": 9.0,
                "unknown_key": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.ffmpeg_path, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(config.ffprobe_path, "ffprobe");
        assert_eq!(config.undo_depth, 10);
        assert_eq!(config.default_aspect_ratio, AspectRatio::Portrait9x16);
        assert_eq!(config.default_zoom, Zoom::new(1.75));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = EditorConfig::from_json(
            r#"{"undo_depth": 0, "autoscroll_margin": -4.0, "ffprobe_path": "  "}"#,
        )
        .unwrap();
        assert_eq!(config.undo_depth, DEFAULT_UNDO_DEPTH);
        assert_eq!(config.autoscroll_margin, AUTOSCROLL_MARGIN);
        assert_eq!(config.ffprobe_path, "ffprobe");
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            EditorConfig::from_json("{ not json"),
            Err(EditorError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let missing = std::env::temp_dir().join("template-studio-missing-config.json");
        assert!(matches!(
            EditorConfig::from_file(&missing),
            Err(EditorError::Io(_))
        ));
    }
}
