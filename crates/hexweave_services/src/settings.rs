//! Settings management
//!
//! A JSON file holding the window setup, the post metadata location and the
//! full [`HexConfig`]. Missing fields take their defaults.

use hexweave_core::config::{ConfigError, HexConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings in '{path}': {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    /// Log frame statistics every this many seconds; 0 disables it.
    pub fps_log_interval: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Hexweave".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            fps_log_interval: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub window: WindowSettings,
    /// Combined post metadata file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posts_path: Option<PathBuf>,
    pub hex: HexConfig,
}

impl Settings {
    /// Read, recompute derived values and validate.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Settings = serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.hex.compute_dependent_values();
        settings.hex.validate().map_err(|source| SettingsError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Like [`Settings::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        match Self::load(path) {
            Err(SettingsError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            result => result,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.window.width = 640;
        settings.hex.grid.tile_outer_radius = 60.0;
        settings.hex.compute_dependent_values();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"window": {"title": "Portfolio"}, "postsPath": "posts.json"}"#).unwrap();
        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.window.title, "Portfolio");
        assert_eq!(settings.window.width, WindowSettings::default().width);
        assert_eq!(settings.posts_path, Some(PathBuf::from("posts.json")));
        assert_eq!(settings.hex, HexConfig::default());
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, r#"{"hex": {"grid": {"tileOuterRadius": -4.0}}}"#).unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Invalid { .. })));
    }

    #[test]
    fn malformed_json_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("malformed.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Settings::load_or_default(&path), Err(SettingsError::Parse { .. })));
    }
}
