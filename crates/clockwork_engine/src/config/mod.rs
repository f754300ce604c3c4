//! Configuration system
//!
//! Engine settings are plain serde structs. Any of them can be stored as TOML
//! or RON; the format is picked from the file extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scene behaviour
    pub scene: SceneConfig,

    /// Scene camera
    pub camera: CameraConfig,

    /// Logging defaults
    pub logging: LoggingConfig,
}

impl Config for EngineConfig {}

/// Scene behaviour settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Run the debug-draw pass after every frame
    pub debug_draw: bool,
}

/// Scene camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Viewport width in pixels
    pub viewport_width: f32,

    /// Viewport height in pixels
    pub viewport_height: f32,

    /// Initial zoom (world units per pixel)
    pub zoom: f32,

    /// Smallest allowed zoom
    pub zoom_min: f32,

    /// Largest allowed zoom
    pub zoom_max: f32,

    /// Zoom change per scroll step
    pub zoom_step: f32,

    /// Free-camera pan multiplier applied to pointer deltas
    pub pan_speed: f32,

    /// Screen Y axis grows downwards
    pub y_down: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            zoom: 1.0,
            zoom_min: 0.1,
            zoom_max: 10.0,
            zoom_step: 0.1,
            pan_speed: 2.0,
            y_down: false,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub default_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str) -> NamedTempFile {
        Builder::new()
            .prefix("clockwork_")
            .suffix(suffix)
            .tempfile()
            .expect("create temp file")
    }

    #[test]
    fn test_toml_round_trip() {
        let file = temp_file(".toml");
        let mut config = EngineConfig::default();
        config.scene.debug_draw = true;
        config.camera.zoom = 2.5;

        config.save_to_file(file.path()).expect("save toml");
        let loaded = EngineConfig::load_from_file(file.path()).expect("load toml");

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_partial_file_uses_defaults() {
        let file = temp_file(".ron");
        std::fs::write(file.path(), "(scene: (debug_draw: true))").expect("write ron");

        let loaded = EngineConfig::load_from_file(file.path()).expect("load ron");

        assert!(loaded.scene.debug_draw);
        assert_eq!(loaded.camera, CameraConfig::default());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_file(".json");
        let result = EngineConfig::default().save_to_file(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
